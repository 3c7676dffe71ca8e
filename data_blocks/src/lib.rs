//! # Data Block Store
//!
//! This crate owns file content: fixed-capacity blocks and their lifetime.
//!
//! ## Philosophy
//!
//! - **Content is a block, not a stream**: every file owns exactly one
//!   fixed-capacity block; offsets and sizes are bookkept here and nowhere else
//! - **Lifetime lives on the block**: the link count is part of the block slot,
//!   one source of truth, mutated only by the link manager
//! - **Locks are explicit**: the slot table has one lock, every block has its
//!   own; content readers never contend with writers of other blocks
//!
//! ## Design
//!
//! - **DataBlock**: the content engine — bounds-checked reads, truncating
//!   writes, `size` never exceeds the bytes actually stored
//! - **BlockStore**: id-indexed slots with per-slot locking and link counts

pub mod block;
pub mod store;

pub use block::{BlockError, DataBlock, BLOCK_CAPACITY};
pub use store::{BlockStore, StoreError};
