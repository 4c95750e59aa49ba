//! Compress and decompress whole streams.

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::error::{HuffError, Result};
use crate::header::{HEADER_SIZE, Header};
use crate::huffman::{Histogram, HuffmanTree};
use crate::io::{BitReader, BitWriter, read_bytes, write_all_bytes};
use crate::{ALPHABET, BLOCK};

/// Symbols counted once in every histogram so the tree always has at least
/// two leaves, even for empty or single-symbol input.
pub const SENTINELS: [u8; 2] = [0x00, 0xFF];

/// Sizes seen by one encode or decode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub uncompressed: u64,
    pub compressed: u64,
}

impl Stats {
    /// Percentage of the uncompressed size saved by compression.
    /// Negative when the output grew.
    pub fn space_saving(&self) -> f64 {
        if self.uncompressed == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.compressed as f64 / self.uncompressed as f64)
    }
}

/// Histogram of `data` with the sentinel symbols already counted.
pub fn histogram(data: &[u8]) -> Histogram {
    let mut hist = [0u64; ALPHABET];
    for s in SENTINELS {
        hist[s as usize] += 1;
    }
    for &b in data {
        hist[b as usize] += 1;
    }
    hist
}

/// Compresses everything `input` yields into `output`.
///
/// `permissions` is recorded verbatim in the header.
pub fn encode<R: Read, W: Write>(mut input: R, mut output: W, permissions: u16) -> Result<Stats> {
    let mut data = Vec::new();
    let mut block = vec![0u8; BLOCK];
    loop {
        let n = read_bytes(&mut input, &mut block)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&block[..n]);
    }

    let hist = histogram(&data);
    let tree = HuffmanTree::from_histogram(&hist)
        .ok_or_else(|| HuffError::MalformedTree("histogram has no symbols".to_string()))?;
    trace!("huffman tree:\n{tree}");
    let table = tree.code_table();
    let dump = tree.dump();

    let header = Header::new(permissions, dump.len() as u16, data.len() as u64);
    debug!(
        magic = %format!("{:#010x}", header.magic),
        permissions = %format!("{:o}", header.permissions),
        tree_size = header.tree_size,
        file_size = header.file_size,
        "writing header"
    );

    write_all_bytes(&mut output, &header.to_bytes()?)?;
    write_all_bytes(&mut output, &dump)?;

    for (symbol, code) in table.iter().enumerate() {
        if !code.is_empty() {
            debug!("0x{symbol:02x}: {code}");
        }
    }

    let mut writer = BitWriter::new(output);
    for &b in &data {
        writer.write_code(&table[b as usize])?;
    }
    writer.flush()?;

    Ok(Stats {
        uncompressed: data.len() as u64,
        compressed: (HEADER_SIZE + dump.len()) as u64 + writer.bytes_written(),
    })
}

/// Decompresses a stream produced by [`encode`] into `output`.
///
/// Stops after exactly `file_size` symbols; trailing padding bits are
/// ignored. Returns the header so the caller can restore permissions.
pub fn decode<R: Read, W: Write>(mut input: R, mut output: W) -> Result<(Header, Stats)> {
    let mut raw = [0u8; HEADER_SIZE];
    let n = read_bytes(&mut input, &mut raw)?;
    if n < HEADER_SIZE {
        return Err(HuffError::Truncated {
            what: "header",
            expected: HEADER_SIZE as u64,
            actual: n as u64,
        });
    }
    let header = Header::from_bytes(&raw)?;
    debug!(
        permissions = %format!("{:o}", header.permissions),
        tree_size = header.tree_size,
        file_size = header.file_size,
        "read header"
    );

    let mut dump = vec![0u8; header.tree_size as usize];
    let n = read_bytes(&mut input, &mut dump)?;
    if n < dump.len() {
        return Err(HuffError::Truncated {
            what: "tree dump",
            expected: dump.len() as u64,
            actual: n as u64,
        });
    }
    let tree = HuffmanTree::rebuild(&dump)?;
    if header.file_size > 0 && tree.root.is_leaf() {
        return Err(HuffError::MalformedTree(
            "tree has a single leaf and cannot address any symbol".to_string(),
        ));
    }

    let mut reader = BitReader::new(input);
    let mut out = Vec::with_capacity(BLOCK);
    let mut decoded = 0u64;
    let mut node = &*tree.root;

    while decoded < header.file_size {
        let Some(bit) = reader.read_bit()? else {
            return Err(HuffError::Truncated {
                what: "bitstream",
                expected: header.file_size,
                actual: decoded,
            });
        };
        node = node.child(bit).ok_or_else(|| {
            HuffError::MalformedTree("walked off the tree while decoding".to_string())
        })?;
        if node.is_leaf() {
            trace!(symbol = node.symbol, "decoded");
            out.push(node.symbol);
            decoded += 1;
            node = &*tree.root;
            if out.len() == BLOCK {
                write_all_bytes(&mut output, &out)?;
                out.clear();
            }
        }
    }
    write_all_bytes(&mut output, &out)?;
    output.flush()?;

    let stats = Stats {
        uncompressed: header.file_size,
        compressed: (HEADER_SIZE + dump.len()) as u64 + reader.bytes_read(),
    };
    Ok((header, stats))
}
