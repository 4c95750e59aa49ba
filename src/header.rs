use serde::{Deserialize, Serialize};

use crate::error::{HuffError, Result};

pub const MAGIC: u32 = 0xDEAD_BEEF;

/// Encoded size of [`Header`]: magic, permissions, tree size, file size.
pub const HEADER_SIZE: usize = 4 + 2 + 2 + 8;

/// Fixed-size record at the start of every compressed file.
///
/// Encoded with bincode's default options, which write each field as a
/// fixed-width little-endian integer with no padding or length prefixes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub permissions: u16,
    pub tree_size: u16,
    pub file_size: u64,
}

impl Header {
    pub fn new(permissions: u16, tree_size: u16, file_size: u64) -> Self {
        Header {
            magic: MAGIC,
            permissions,
            tree_size,
            file_size,
        }
    }

    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let encoded = bincode::serialize(self)?;
        encoded.try_into().map_err(|v: Vec<u8>| {
            HuffError::Header(Box::new(bincode::ErrorKind::Custom(format!(
                "header encoded to {} bytes, expected {HEADER_SIZE}",
                v.len()
            ))))
        })
    }

    /// Decodes a header and checks its magic number.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let header: Header = bincode::deserialize(bytes)?;
        if header.magic != MAGIC {
            return Err(HuffError::BadMagic {
                found: header.magic,
            });
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian_and_packed() {
        let h = Header::new(0o100644, 767, 0x0102_0304_0506_0708);
        let bytes = h.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(&bytes[4..6], &(0o100644u32 as u16).to_le_bytes());
        assert_eq!(&bytes[6..8], &767u16.to_le_bytes());
        assert_eq!(&bytes[8..16], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(Header::from_bytes(&bytes).unwrap(), h);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = Header::new(0o644, 5, 10).to_bytes().unwrap();
        bytes[0] ^= 0xFF;
        match Header::from_bytes(&bytes) {
            Err(HuffError::BadMagic { found }) => assert_eq!(found, MAGIC ^ 0xFF),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }
}
