//! Directory entry records

use fs_types::{BlockId, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// One directory entry: a name under a parent
///
/// Several file nodes may reference the same content block (hard links);
/// each node belongs to exactly one parent. Only the root has no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Unique id, assigned by the registry, never reused
    pub id: NodeId,
    /// Owning directory (`None` only for the root)
    pub parent: Option<NodeId>,
    /// Entry name under the parent
    pub name: String,
    /// File or directory
    pub kind: NodeKind,
    /// Content block (`Some` exactly for files)
    pub block: Option<BlockId>,
}

impl FileNode {
    /// Creates a file node referencing a content block
    pub fn new_file(id: NodeId, parent: NodeId, name: String, block: BlockId) -> Self {
        Self {
            id,
            parent: Some(parent),
            name,
            kind: NodeKind::File,
            block: Some(block),
        }
    }

    /// Creates a directory node
    pub fn new_directory(id: NodeId, parent: Option<NodeId>, name: String) -> Self {
        Self {
            id,
            parent,
            name,
            kind: NodeKind::Directory,
            block: None,
        }
    }

    /// Check if this is a file
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this is a directory
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Check if this is the root (the only parentless node)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
