//! The flat node registry and its indices
//!
//! Storage is one table of live nodes indexed by id, with a per-parent name
//! table on the side. Lookups and listings touch only the directory they
//! target; nothing scans the whole registry.

use crate::node::FileNode;
use fs_types::{BlockId, NodeId, NodeKind, FIRST_NODE_ID};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No live node with this id
    #[error("No such node: {0}")]
    NoSuchNode(NodeId),

    /// A sibling with this name already exists
    #[error("Duplicate name under {parent}: {name}")]
    DuplicateName { parent: NodeId, name: String },

    /// The configured node limit is reached
    #[error("Node table full: {0} nodes")]
    TableFull(usize),
}

/// The set of all live file nodes plus the id allocator
///
/// Two indices are kept in lockstep: `by_id` owns the records, `by_parent`
/// maps each directory to its children by name. The name tables are ordered
/// maps, so listings come back in a stable name order; callers must not rely
/// on any particular ordering.
#[derive(Debug)]
pub struct NodeRegistry {
    by_id: HashMap<NodeId, FileNode>,
    by_parent: HashMap<NodeId, BTreeMap<String, NodeId>>,
    next_id: NodeId,
    max_nodes: Option<usize>,
}

impl NodeRegistry {
    /// Creates an empty registry, optionally bounded to `max_nodes` live nodes
    pub fn new(max_nodes: Option<usize>) -> Self {
        Self {
            by_id: HashMap::new(),
            by_parent: HashMap::new(),
            next_id: FIRST_NODE_ID,
            max_nodes,
        }
    }

    /// Assigns the next id and inserts a new record
    ///
    /// `parent` is `None` only for the root. Fails when the node limit is
    /// reached or when the (parent, name) binding is already taken; the
    /// operations layer clears the binding first when its policy allows
    /// shadowing.
    pub fn allocate(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        kind: NodeKind,
        block: Option<BlockId>,
    ) -> Result<NodeId, RegistryError> {
        if let Some(max) = self.max_nodes {
            if self.by_id.len() >= max {
                return Err(RegistryError::TableFull(self.by_id.len()));
            }
        }
        if let Some(parent) = parent {
            if let Some(children) = self.by_parent.get(&parent) {
                if children.contains_key(name) {
                    return Err(RegistryError::DuplicateName {
                        parent,
                        name: name.to_string(),
                    });
                }
            }
        }

        let id = self.next_id;
        self.next_id = self.next_id.next();

        let node = FileNode {
            id,
            parent,
            name: name.to_string(),
            kind,
            block,
        };
        self.by_id.insert(id, node);
        if let Some(parent) = parent {
            self.by_parent
                .entry(parent)
                .or_default()
                .insert(name.to_string(), id);
        }

        Ok(id)
    }

    /// Finds a live node by id
    pub fn find_by_id(&self, id: NodeId) -> Option<&FileNode> {
        self.by_id.get(&id)
    }

    /// Finds a live node by its (parent, name) binding
    pub fn find_by_name(&self, parent: NodeId, name: &str) -> Option<&FileNode> {
        let id = self.by_parent.get(&parent)?.get(name)?;
        self.by_id.get(id)
    }

    /// Splices a record out of both indices, returning it
    pub fn remove(&mut self, id: NodeId) -> Result<FileNode, RegistryError> {
        let node = self.by_id.remove(&id).ok_or(RegistryError::NoSuchNode(id))?;

        if let Some(parent) = node.parent {
            if let Some(children) = self.by_parent.get_mut(&parent) {
                children.remove(&node.name);
                if children.is_empty() {
                    self.by_parent.remove(&parent);
                }
            }
        }
        // A directory removed while empty leaves no name table behind.
        self.by_parent.remove(&id);

        Ok(node)
    }

    /// Iterates the live children of a directory
    ///
    /// The iterator is restartable and yields each child exactly once, in
    /// the name table's order.
    pub fn children_of(&self, parent: NodeId) -> impl Iterator<Item = &FileNode> + '_ {
        self.by_parent
            .get(&parent)
            .into_iter()
            .flat_map(|children| children.values())
            .filter_map(|id| self.by_id.get(id))
    }

    /// Number of live children under a directory
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.by_parent.get(&parent).map_or(0, |c| c.len())
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no nodes are live
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}
