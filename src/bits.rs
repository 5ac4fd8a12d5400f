//! Fixed-size packed bit array.
//!
//! Bits live in 32-bit words, least significant bit first:
//!
//! ```text
//! Word 0: [bit 0][bit 1]...[bit 31]
//! Word 1: [bit 32][bit 33]...[bit 63]
//! ```
//!
//! Bits past `len()` in the last word are padding and never observed.
use crate::error::{BloomError, BloomResult};
use bitvec::{order::Lsb0, vec::BitVec};

/// Number of bits per storage word.
pub const WORD_BITS: usize = u32::BITS as usize;

/// Initial value of every bit in a new [`BitVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    #[default]
    Cleared,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    bits: BitVec<u32, Lsb0>,
}

impl BitVector {
    pub fn new(bit_count: usize, fill: Fill) -> Self {
        Self {
            bits: BitVec::repeat(fill == Fill::Set, bit_count),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of backing words, `ceil(len / 32)`.
    pub fn word_count(&self) -> usize {
        self.bits.as_raw_slice().len()
    }

    pub fn words(&self) -> &[u32] {
        self.bits.as_raw_slice()
    }

    pub fn get(&self, index: usize) -> BloomResult<bool> {
        self.check_index(index)?;
        Ok(self.bits[index])
    }

    /// Sets the bit to 1. Setting an already set bit is a no-op.
    pub fn set(&mut self, index: usize) -> BloomResult<()> {
        self.check_index(index)?;
        self.bits.set(index, true);
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> BloomResult<()> {
        self.check_index(index)?;
        self.bits.set(index, false);
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> BloomResult<()> {
        self.check_index(index)?;
        let current = self.bits[index];
        self.bits.set(index, !current);
        Ok(())
    }

    /// Number of set bits, padding excluded.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Heap memory held by the word storage.
    pub fn memory_bytes(&self) -> usize {
        self.word_count() * std::mem::size_of::<u32>()
    }

    fn check_index(&self, index: usize) -> BloomResult<()> {
        if index >= self.bits.len() {
            return Err(BloomError::IndexOutOfRange {
                index,
                len: self.bits.len(),
            });
        }
        Ok(())
    }
}
