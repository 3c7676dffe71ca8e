//! Verb surface and error model
//!
//! This module defines the operations the host integration layer calls and
//! the records they hand back.

use data_blocks::{BlockError, StoreError};
use fs_types::{NameError, NodeId, NodeKind};
use node_registry::{FileNode, RegistryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by file store verbs
#[derive(Debug, Error)]
pub enum OperationError {
    /// Name or id absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A sibling with this name already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A configured node or block limit is reached
    #[error("Out of memory")]
    OutOfMemory,

    /// Offset, kind or target unsuitable for the verb
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller-held handle no longer matches the live record
    #[error("Inconsistent handle: {0}")]
    Inconsistent(String),

    /// Copy across the host boundary failed
    #[error("I/O fault: {0}")]
    IoFault(String),

    /// rmdir of a directory that still has children
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Entry name failed validation
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),
}

impl From<RegistryError> for OperationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NoSuchNode(id) => Self::NotFound(id.to_string()),
            RegistryError::DuplicateName { name, .. } => Self::AlreadyExists(name),
            RegistryError::TableFull(_) => Self::OutOfMemory,
        }
    }
}

impl From<StoreError> for OperationError {
    fn from(err: StoreError) -> Self {
        match err {
            // A node pointing at a missing block means the indices diverged.
            StoreError::NoSuchBlock(id) => Self::Inconsistent(id.to_string()),
            StoreError::TableFull(_) => Self::OutOfMemory,
            StoreError::Block(BlockError::OffsetBeyondCapacity(offset)) => {
                Self::InvalidArgument(format!("write offset {offset} beyond block capacity"))
            }
        }
    }
}

/// One directory entry as handed to the host
///
/// The host injects any synthetic `.`/`..` entries itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntryRecord {
    /// Entry name
    pub name: String,
    /// Node id
    pub id: NodeId,
    /// File or directory
    pub kind: NodeKind,
}

impl From<&FileNode> for DirEntryRecord {
    fn from(node: &FileNode) -> Self {
        Self {
            name: node.name.clone(),
            id: node.id,
            kind: node.kind,
        }
    }
}

/// Metadata snapshot of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Node id
    pub id: NodeId,
    /// File or directory
    pub kind: NodeKind,
    /// Content size in bytes (files only)
    pub size: Option<usize>,
    /// Names currently sharing the content block (files only)
    pub links: Option<u32>,
    /// Live children (directories only)
    pub children: Option<usize>,
}

/// File store verb set
///
/// One-to-one with the host's filesystem operations. All verbs are
/// synchronous and run to completion or return a typed error.
pub trait FileStoreOperations {
    /// The root directory handle, created once at mount
    fn root(&self) -> NodeId;

    /// Resolves a child by name; an absent child is not an error
    fn lookup(&self, parent: NodeId, name: &str)
        -> Result<Option<DirEntryRecord>, OperationError>;

    /// Lists live children of a directory, starting at `cursor`
    ///
    /// Each live child appears exactly once per full pass. The order is the
    /// registry's internal order and not part of the contract.
    fn iterate(&self, dir: NodeId, cursor: usize) -> Result<Vec<DirEntryRecord>, OperationError>;

    /// Creates a file with a fresh empty content block
    ///
    /// `mode` is carried for the host's metadata layer and not interpreted.
    fn create(&self, parent: NodeId, name: &str, mode: u32) -> Result<NodeId, OperationError>;

    /// Creates a directory
    ///
    /// `mode` is carried for the host's metadata layer and not interpreted.
    fn mkdir(&self, parent: NodeId, name: &str, mode: u32) -> Result<NodeId, OperationError>;

    /// Removes a file entry; frees the content block with the last link
    ///
    /// A host holding a node handle passes it as `expected` to defend
    /// against racing a concurrent replace; a mismatch fails `Inconsistent`.
    fn unlink(
        &self,
        parent: NodeId,
        name: &str,
        expected: Option<NodeId>,
    ) -> Result<(), OperationError>;

    /// Removes an empty directory
    fn rmdir(&self, parent: NodeId, name: &str) -> Result<(), OperationError>;

    /// Reads up to `len` bytes of file content at `offset`
    fn read(&self, file: NodeId, offset: usize, len: usize) -> Result<Vec<u8>, OperationError>;

    /// Writes file content at `offset`, returning the bytes actually stored
    fn write(&self, file: NodeId, offset: usize, data: &[u8]) -> Result<usize, OperationError>;

    /// Adds a second name for an existing file's content (hard link)
    fn link(
        &self,
        existing: NodeId,
        new_parent: NodeId,
        new_name: &str,
    ) -> Result<NodeId, OperationError>;

    /// Metadata snapshot for a node
    fn stat(&self, node: NodeId) -> Result<StatRecord, OperationError>;
}
