//! Reference-counted block store
//!
//! The store hands out block ids and tracks how many directory entries link
//! to each block. Link counts are mutated only by the link manager; a block
//! is dropped exactly when its count reaches zero.

use crate::block::{BlockError, DataBlock};
use fs_types::BlockId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Errors from block store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live block with this id
    #[error("No such block: {0}")]
    NoSuchBlock(BlockId),

    /// The configured block limit is reached
    #[error("Block table full: {0} blocks in use")]
    TableFull(usize),

    /// Content engine failure
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// One slot in the store: the block behind its own lock, plus the link count
struct BlockSlot {
    links: AtomicU32,
    data: Mutex<DataBlock>,
}

/// Id-indexed store of reference-counted content blocks
///
/// The slot table sits behind one `RwLock`; each block carries its own
/// `Mutex`, so concurrent readers and writers of different blocks never
/// contend, and a reader of one block never observes a torn write.
pub struct BlockStore {
    slots: RwLock<HashMap<BlockId, Arc<BlockSlot>>>,
    next_id: AtomicU64,
    max_blocks: Option<usize>,
}

impl BlockStore {
    /// Creates an empty store, optionally bounded to `max_blocks` live blocks
    pub fn new(max_blocks: Option<usize>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            max_blocks,
        }
    }

    /// Allocates a fresh zeroed block with a link count of one
    pub fn allocate(&self) -> Result<BlockId, StoreError> {
        let mut slots = self.slots.write().unwrap();
        if let Some(max) = self.max_blocks {
            if slots.len() >= max {
                return Err(StoreError::TableFull(slots.len()));
            }
        }

        let id = BlockId::from_raw(self.next_id.fetch_add(1, Ordering::SeqCst));
        let slot = Arc::new(BlockSlot {
            links: AtomicU32::new(1),
            data: Mutex::new(DataBlock::new()),
        });
        slots.insert(id, slot);
        Ok(id)
    }

    /// Adds one link to a live block, returning the new count
    pub fn retain(&self, id: BlockId) -> Result<u32, StoreError> {
        let slots = self.slots.read().unwrap();
        let slot = slots.get(&id).ok_or(StoreError::NoSuchBlock(id))?;
        Ok(slot.links.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Drops one link; frees the block and returns true when it was the last
    pub fn release(&self, id: BlockId) -> Result<bool, StoreError> {
        let mut slots = self.slots.write().unwrap();
        let slot = slots.get(&id).ok_or(StoreError::NoSuchBlock(id))?;
        let previous = slot.links.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            slots.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    /// Current link count of a live block
    pub fn link_count(&self, id: BlockId) -> Result<u32, StoreError> {
        let slots = self.slots.read().unwrap();
        let slot = slots.get(&id).ok_or(StoreError::NoSuchBlock(id))?;
        Ok(slot.links.load(Ordering::SeqCst))
    }

    /// Logical size of a live block
    pub fn size_of(&self, id: BlockId) -> Result<usize, StoreError> {
        let slot = self.slot(id)?;
        let data = slot.data.lock().unwrap();
        Ok(data.size())
    }

    /// Reads up to `len` bytes at `offset` from a live block
    pub fn read(&self, id: BlockId, offset: usize, len: usize) -> Result<Vec<u8>, StoreError> {
        let slot = self.slot(id)?;
        let data = slot.data.lock().unwrap();
        Ok(data.read(offset, len).to_vec())
    }

    /// Writes `data` at `offset` into a live block, returning bytes stored
    pub fn write(&self, id: BlockId, offset: usize, data: &[u8]) -> Result<usize, StoreError> {
        let slot = self.slot(id)?;
        let mut block = slot.data.lock().unwrap();
        Ok(block.write(offset, data)?)
    }

    /// Number of live blocks
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// True when no blocks are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: BlockId) -> Result<Arc<BlockSlot>, StoreError> {
        let slots = self.slots.read().unwrap();
        slots.get(&id).cloned().ok_or(StoreError::NoSuchBlock(id))
    }
}
