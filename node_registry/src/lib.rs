//! # Node Registry
//!
//! This crate is the authoritative name/child index of the file store.
//!
//! ## Philosophy
//!
//! - **One flat registry, two indices**: every live node is reachable by id
//!   and by (parent, name); neither index is ever allowed to drift from the
//!   other
//! - **Ids are forever**: the allocator only counts up; a removed node's id
//!   is never handed out again
//! - **No hidden locking**: the registry is a plain owned value; the
//!   operations layer decides the lock scope and injects the registry where
//!   it is needed

pub mod node;
pub mod registry;

pub use node::FileNode;
pub use registry::{NodeRegistry, RegistryError};
