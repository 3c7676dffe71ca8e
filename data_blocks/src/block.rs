//! Fixed-capacity content engine
//!
//! A block holds up to [`BLOCK_CAPACITY`] bytes of file content plus the
//! logical size of the valid prefix. Writes beyond capacity are truncated;
//! a write starting at offset zero discards previous content first.

use thiserror::Error;

/// Fixed content capacity of every block (1 KiB)
pub const BLOCK_CAPACITY: usize = 1024;

/// Errors from block content operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    /// Write offset at or beyond the block capacity
    #[error("Write offset {0} beyond block capacity {BLOCK_CAPACITY}")]
    OffsetBeyondCapacity(usize),
}

/// One fixed-capacity content block
///
/// The payload is zero-initialized, so a write that leaves a gap beyond the
/// previous size exposes zeros in between. `size` counts the bytes actually
/// stored; a truncated write never advances it past what was copied.
#[derive(Debug, Clone)]
pub struct DataBlock {
    size: usize,
    payload: [u8; BLOCK_CAPACITY],
}

impl DataBlock {
    /// Creates an empty, zeroed block
    pub fn new() -> Self {
        Self {
            size: 0,
            payload: [0u8; BLOCK_CAPACITY],
        }
    }

    /// Bytes logically valid in this block
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads up to `len` bytes starting at `offset`
    ///
    /// Returns the empty slice when `offset` is at or past the current size,
    /// otherwise `min(len, size - offset)` bytes.
    pub fn read(&self, offset: usize, len: usize) -> &[u8] {
        if offset >= self.size {
            return &[];
        }
        let end = self.size.min(offset.saturating_add(len));
        &self.payload[offset..end]
    }

    /// Writes `data` at `offset`, returning the number of bytes stored
    ///
    /// Fails if `offset` is at or beyond the capacity. A write at offset zero
    /// truncates the block before storing. Data that does not fit within the
    /// capacity is dropped; the returned count and the block size reflect
    /// only the bytes actually copied.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<usize, BlockError> {
        if offset >= BLOCK_CAPACITY {
            return Err(BlockError::OffsetBeyondCapacity(offset));
        }
        if offset == 0 {
            self.size = 0;
        }

        let write_len = data.len().min(BLOCK_CAPACITY - offset);
        self.payload[offset..offset + write_len].copy_from_slice(&data[..write_len]);
        self.size = self.size.max(offset + write_len);

        Ok(write_len)
    }
}

impl Default for DataBlock {
    fn default() -> Self {
        Self::new()
    }
}
