//! Block-buffered byte and bit I/O.
//!
//! Bits are addressed little-endian within a byte: bit `i` of a buffer is
//! bit `i % 8` (counting from the least significant) of byte `i / 8`.

use std::io::{self, ErrorKind, Read, Write};

use crate::code::Code;
use crate::BLOCK;

/// Reads until `buf` is full or the source reports end of data.
/// Returns the number of bytes read, which is short only at end of data.
pub fn read_bytes<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Writes until all of `buf` is written or the sink accepts nothing more.
/// Returns the number of bytes written.
pub fn write_bytes<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match writer.write(&buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Like [`write_bytes`], but a short write is an error.
pub fn write_all_bytes<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<()> {
    let written = write_bytes(writer, buf)?;
    if written < buf.len() {
        return Err(io::Error::new(
            ErrorKind::WriteZero,
            format!("sink accepted {written} of {} bytes", buf.len()),
        ));
    }
    Ok(())
}

/// A block of bytes addressed bit by bit.
#[derive(Debug)]
struct BitBuffer {
    bytes: Box<[u8]>,
}

impl BitBuffer {
    fn new() -> Self {
        BitBuffer {
            bytes: vec![0u8; BLOCK].into_boxed_slice(),
        }
    }

    fn set_bit(&mut self, i: usize) {
        self.bytes[i / 8] |= 1 << (i % 8);
    }

    fn clear_bit(&mut self, i: usize) {
        self.bytes[i / 8] &= !(1 << (i % 8));
    }

    fn get_bit(&self, i: usize) -> bool {
        (self.bytes[i / 8] >> (i % 8)) & 1 == 1
    }
}

/// Reads a packed bitstream one bit at a time, refilling a block at a time.
pub struct BitReader<R: Read> {
    source: R,
    buffer: BitBuffer,
    index: usize,
    filled: usize,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        BitReader {
            source,
            buffer: BitBuffer::new(),
            index: 0,
            filled: 0,
            bytes_read: 0,
        }
    }

    /// Returns the next bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.index == self.filled * 8 {
            self.filled = read_bytes(&mut self.source, &mut self.buffer.bytes)?;
            self.index = 0;
            self.bytes_read += self.filled as u64;
            if self.filled == 0 {
                return Ok(None);
            }
        }
        let bit = self.buffer.get_bit(self.index);
        self.index += 1;
        Ok(Some(bit))
    }

    /// Bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Packs codes into a block buffer, writing each block out once it fills.
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: BitBuffer,
    index: usize,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            buffer: BitBuffer::new(),
            index: 0,
            bytes_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.buffer.set_bit(self.index);
        } else {
            self.buffer.clear_bit(self.index);
        }
        self.index += 1;
        if self.index == BLOCK * 8 {
            write_all_bytes(&mut self.sink, &self.buffer.bytes)?;
            self.bytes_written += BLOCK as u64;
            self.index = 0;
        }
        Ok(())
    }

    /// Appends the bits of `code` in root-to-leaf order.
    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Writes out the partial final block, `ceil(bits / 8)` bytes. Bits past
    /// the last one written in the final byte are padding.
    pub fn flush(&mut self) -> io::Result<()> {
        let nbytes = self.index.div_ceil(8);
        write_all_bytes(&mut self.sink, &self.buffer.bytes[..nbytes])?;
        self.bytes_written += nbytes as u64;
        self.index = 0;
        self.sink.flush()
    }

    /// Bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
