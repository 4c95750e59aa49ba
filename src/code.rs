use std::fmt;

use crate::ALPHABET;

const CODE_BYTES: usize = ALPHABET / 8;

/// A stack of bits recording the path from the tree root to a leaf.
///
/// Bit `0` means "go left", bit `1` means "go right". Bits are stored in
/// push order, so iterating from index 0 replays the walk from the root.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Code {
    top: u32,
    bits: [u8; CODE_BYTES],
}

impl Code {
    pub const fn new() -> Self {
        Code {
            top: 0,
            bits: [0; CODE_BYTES],
        }
    }

    pub fn size(&self) -> u32 {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn is_full(&self) -> bool {
        self.top as usize == ALPHABET
    }

    /// Pushes a bit. Returns `false` if the code already holds 256 bits.
    pub fn push_bit(&mut self, bit: bool) -> bool {
        if self.is_full() {
            return false;
        }
        let i = self.top as usize;
        if bit {
            self.bits[i / 8] |= 1 << (i % 8);
        } else {
            self.bits[i / 8] &= !(1 << (i % 8));
        }
        self.top += 1;
        true
    }

    /// Pops the most recently pushed bit, or `None` if the code is empty.
    pub fn pop_bit(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        self.top -= 1;
        Some(self.get_bit(self.top as usize))
    }

    /// Returns bit `i` counted from the root. `i` must be below `size()`.
    pub fn get_bit(&self, i: usize) -> bool {
        (self.bits[i / 8] >> (i % 8)) & 1 == 1
    }

    /// Iterates the bits in root-to-leaf order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.top as usize).map(|i| self.get_bit(i))
    }
}

impl Default for Code {
    fn default() -> Self {
        Self::new()
    }
}

// Renders as '0'/'1' characters in root-to-leaf order.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut c = Code::new();
        assert!(c.is_empty());
        assert!(c.push_bit(true));
        assert!(c.push_bit(false));
        assert!(c.push_bit(true));
        assert_eq!(c.size(), 3);
        assert_eq!(c.to_string(), "101");

        assert_eq!(c.pop_bit(), Some(true));
        assert_eq!(c.pop_bit(), Some(false));
        assert_eq!(c.pop_bit(), Some(true));
        assert_eq!(c.pop_bit(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn pop_clears_stale_bits_on_repush() {
        let mut c = Code::new();
        c.push_bit(true);
        c.pop_bit();
        c.push_bit(false);
        assert_eq!(c.to_string(), "0");
    }

    #[test]
    fn rejects_257th_bit() {
        let mut c = Code::new();
        for i in 0..ALPHABET {
            assert!(c.push_bit(i % 3 == 0));
        }
        assert!(c.is_full());
        assert!(!c.push_bit(true));
        assert_eq!(c.size(), 256);

        // state is intact after the rejected push
        assert_eq!(c.pop_bit(), Some(255 % 3 == 0));
        assert!(!c.is_full());
        assert!(c.push_bit(true));
    }

    #[test]
    fn empty_code_renders_nothing() {
        assert_eq!(Code::new().to_string(), "");
    }
}
