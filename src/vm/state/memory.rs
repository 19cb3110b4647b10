//! This module contains the definition of the interpreter's memory.

use bitvec::vec::BitVec;

use crate::{constant::WORD_SIZE_BYTES, vm::value::Word};

/// A representation of the transient memory of the interpreter.
///
/// Like memory on a real EVM it is a byte array that grows as needed. Alongside
/// each byte the memory tracks whether its value is known. Bytes written with
/// concrete values are known, while bytes overwritten by values that only exist
/// at runtime (for example by `CALLDATACOPY`, or an `MSTORE` of a symbolic
/// value) are not. Reads that touch an unknown byte have no concrete result.
///
/// Memory grows to cover the end of each write, zero-filling the new region.
/// It never shrinks. Bytes past its end have never been written by the code
/// under analysis, so they are not known.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Memory {
    data:  Vec<u8>,
    known: BitVec,
}

impl Memory {
    /// Constructs a new memory that currently stores no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the 32 bytes of `value` in big-endian order at `offset`.
    pub fn store(&mut self, offset: usize, value: Word) {
        self.write(offset, &value.bytes_be());
    }

    /// Stores `value` at `offset` as the most significant byte of an
    /// otherwise zero word.
    ///
    /// This overwrites the 31 bytes following `offset` with zeroes.
    pub fn store_byte(&mut self, offset: usize, value: u8) {
        let mut bytes = [0u8; WORD_SIZE_BYTES];
        bytes[0] = value;
        self.write(offset, &bytes);
    }

    /// Marks the `size` bytes at `offset` as holding values that are not
    /// known.
    pub fn forget(&mut self, offset: usize, size: usize) {
        if size == 0 {
            return;
        }
        let end = offset + size;
        self.grow(end);
        self.data[offset..end].fill(0);
        self.known[offset..end].fill(false);
    }

    /// Loads the 32 bytes at `offset` as a big-endian word.
    ///
    /// Returns [`None`] if any of those bytes are not known.
    #[must_use]
    pub fn load(&self, offset: usize) -> Option<Word> {
        let bytes = self.read(offset, WORD_SIZE_BYTES)?;
        Word::from_be_slice(&bytes).ok()
    }

    /// Reads `size` bytes starting at `offset`.
    ///
    /// Returns [`None`] if any of those bytes are not known. An empty read is
    /// always known, wherever it starts.
    #[must_use]
    pub fn read(&self, offset: usize, size: usize) -> Option<Vec<u8>> {
        if size == 0 {
            return Some(Vec::new());
        }
        let end = offset.checked_add(size)?;
        if end > self.data.len() || !self.known[offset..end].all() {
            return None;
        }

        Some(self.data[offset..end].to_vec())
    }

    /// Copies `size` bytes from `source` to `destination`, as `MCOPY` does.
    ///
    /// Whether each byte is known travels with it, and bytes copied from past
    /// the end of memory are not known.
    pub fn copy(&mut self, destination: usize, source: usize, size: usize) {
        if size == 0 {
            return;
        }
        let mut bytes = vec![0u8; size];
        let mut known = BitVec::repeat(false, size);
        let available = self.data.len().saturating_sub(source).min(size);
        if available > 0 {
            bytes[..available].copy_from_slice(&self.data[source..source + available]);
            known[..available].copy_from_bitslice(&self.known[source..source + available]);
        }

        self.write(destination, &bytes);
        self.known[destination..destination + size].copy_from_bitslice(&known);
    }

    /// Gets the current size of memory in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the memory has ever been written to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        self.grow(end);
        self.data[offset..end].copy_from_slice(bytes);
        self.known[offset..end].fill(true);
    }

    fn grow(&mut self, end: usize) {
        if self.data.len() < end {
            self.data.resize(end, 0);
            self.known.resize(end, true);
        }
    }
}
