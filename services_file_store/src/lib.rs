//! # File Store Service
//!
//! This service is the data-management core of a memory-resident hierarchical
//! file store: the verb set a host filesystem-integration layer calls into.
//!
//! ## Philosophy
//!
//! - **The host owns the outside**: path resolution, permissions, mode bits,
//!   timestamps and handle mapping happen above this layer; the core receives
//!   node ids and single-component names
//! - **Names bind, links own**: a directory entry is one link unit; content
//!   lives exactly as long as at least one name references it
//! - **Every failure is typed**: verbs return a typed error to their caller;
//!   nothing retries, nothing is fatal, a failed verb changes nothing
//!
//! ## Operations
//!
//! - `lookup(parent, name)`: resolve a child, absent is not an error
//! - `iterate(dir, cursor)`: list live children from a cursor onward
//! - `create(parent, name, mode)` / `mkdir(parent, name, mode)`
//! - `unlink(parent, name, expected)` / `rmdir(parent, name)`
//! - `read(file, offset, len)` / `write(file, offset, data)`
//! - `link(existing, new_parent, new_name)`: hard-link, no content copy
//! - `stat(node)`: id, kind, size, link count

pub mod config;
pub mod links;
pub mod operations;
pub mod service;

pub use config::{DuplicatePolicy, StoreConfig};
pub use links::LinkManager;
pub use operations::{DirEntryRecord, FileStoreOperations, OperationError, StatRecord};
pub use service::FileStoreService;
