//! Error types for compression and decompression.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid magic number: {found:#010x}")]
    BadMagic { found: u32 },

    #[error("Malformed tree dump: {0}")]
    MalformedTree(String),

    #[error("Truncated {what}: expected {expected} bytes, got {actual}")]
    Truncated {
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("Header encoding error: {0}")]
    Header(#[from] bincode::Error),
}
