use std::fmt;
use std::str::FromStr;

use crate::error::HuffmanError;

/// Growable sequence of bits, packed MSB-first into bytes.
///
/// Used both for single codes and for whole encoded messages. The text form
/// (`Display`/`FromStr`) is one '0' or '1' character per bit.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Append every bit of `other`, in order.
    pub fn extend_from(&mut self, other: &BitVec) {
        for bit in other.iter() {
            self.push_bit(bit);
        }
    }

    /// Copy of `self` with one extra bit on the end.
    pub fn with_bit(&self, bit: bool) -> BitVec {
        let mut child = self.clone();
        child.push_bit(bit);
        child
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        let byte = self.bits[index / 8];
        Some(byte & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { vec: self, pos: 0 }
    }

    pub fn starts_with(&self, prefix: &BitVec) -> bool {
        prefix.len() <= self.len() && prefix.iter().zip(self.iter()).all(|(a, b)| a == b)
    }
}

pub struct Iter<'a> {
    vec: &'a BitVec,
    pos: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.vec.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.vec.len() - self.pos;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BitVec {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut vec = BitVec::new();
        for bit in iter {
            vec.push_bit(bit);
        }
        vec
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitVec {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut vec = BitVec::with_capacity(s.len());
        for (position, found) in s.chars().enumerate() {
            match found {
                '0' => vec.push_bit(false),
                '1' => vec.push_bit(true),
                _ => return Err(HuffmanError::InvalidBit { position, found }),
            }
        }
        Ok(vec)
    }
}
