//! Unique identifiers for file store entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// First node id handed out by a fresh registry.
///
/// Ids below this value are reserved; the root directory receives exactly
/// this id at mount time.
pub const FIRST_NODE_ID: NodeId = NodeId(1000);

/// Unique identifier for a directory entry (file or directory)
///
/// Node ids are assigned monotonically by the registry and are never reused,
/// even after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a node id from a raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the id following this one in allocation order
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Unique identifier for a content block
///
/// Block ids are assigned monotonically by the block store and are never
/// reused. Several nodes may reference the same block (hard links).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u64);

impl BlockId {
    /// Creates a block id from a raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the id following this one in allocation order
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/// Unique identifier for one mounted file store instance
///
/// A volume id ties log lines and stat output back to the instance that
/// produced them when a host mounts more than one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId(Uuid);

impl VolumeId {
    /// Creates a new random volume ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a volume ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for VolumeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Volume({})", self.0)
    }
}
