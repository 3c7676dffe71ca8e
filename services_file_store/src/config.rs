//! Store configuration

use serde::{Deserialize, Serialize};

/// What to do when a create or link targets an already-bound (parent, name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Fail the operation with `AlreadyExists`
    #[default]
    Reject,

    /// Let the new entry take the name; the displaced file entry is released
    /// as if it had been unlinked. Directory bindings are never displaced.
    Shadow,
}

/// Configuration for one mounted file store
///
/// Limits are counts of live entries; `None` means unbounded. Hitting a
/// limit surfaces as `OutOfMemory` to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Duplicate-name handling for create, mkdir and link
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Maximum live nodes, root included
    #[serde(default)]
    pub max_nodes: Option<usize>,

    /// Maximum live content blocks
    #[serde(default)]
    pub max_blocks: Option<usize>,
}

impl StoreConfig {
    /// Configuration with the given duplicate policy and no limits
    pub fn with_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            duplicate_policy,
            ..Self::default()
        }
    }
}
