//! Node kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a directory entry
///
/// The core distinguishes exactly two kinds: files carry a content block,
/// directories carry children. Device nodes, symlinks and the like are the
/// host layer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Regular file backed by a content block
    File,

    /// Directory containing named children
    Directory,
}

impl NodeKind {
    /// Check if this is a file
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Check if this is a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "File"),
            NodeKind::Directory => write!(f, "Directory"),
        }
    }
}
