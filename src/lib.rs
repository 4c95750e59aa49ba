//! # huff
//!
//! Lossless file compression with static Huffman coding over the byte
//! alphabet.
//!
//! A compressed file is a 16-byte [`Header`], the postorder dump of the
//! Huffman tree, and the packed codes of every input byte.
//!
//! ```rust
//! use std::io::Cursor;
//!
//! let mut packed = Vec::new();
//! huff::encode(Cursor::new(b"abracadabra"), &mut packed, 0o644)?;
//!
//! let mut unpacked = Vec::new();
//! huff::decode(Cursor::new(&packed), &mut unpacked)?;
//! assert_eq!(unpacked, b"abracadabra");
//! # Ok::<(), huff::HuffError>(())
//! ```

pub mod code;
pub mod codec;
pub mod error;
pub mod header;
pub mod huffman;
pub mod io;
pub mod logger;
pub mod node;
pub mod pq;
pub mod stack;

/// Number of distinct symbols: every byte value.
pub const ALPHABET: usize = 256;

/// Size in bytes of the I/O block buffers.
pub const BLOCK: usize = 4096;

pub use code::Code;
pub use codec::{Stats, decode, encode};
pub use error::{HuffError, Result};
pub use header::{Header, MAGIC};
pub use huffman::HuffmanTree;
