//! Link lifetime management
//!
//! The link manager is the single authority over node and block lifetime:
//! it creates and destroys file node records and is the only code that
//! touches block link counts. Every directory entry is exactly one link
//! unit; the block outlives entries until the last one goes.

use crate::operations::OperationError;
use data_blocks::BlockStore;
use fs_types::{NodeId, NodeKind};
use log::{debug, warn};
use node_registry::NodeRegistry;

/// Creates and destroys directory entries, mediating block sharing
///
/// The caller holds the registry lock for the duration of each call; the
/// manager itself owns the block store.
pub struct LinkManager {
    blocks: BlockStore,
}

impl LinkManager {
    /// Creates a link manager with an optionally bounded block store
    pub fn new(max_blocks: Option<usize>) -> Self {
        Self {
            blocks: BlockStore::new(max_blocks),
        }
    }

    /// The underlying block store (content read/write paths go here)
    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    /// Creates a file entry with a fresh content block, link count one
    pub fn create_file(
        &self,
        registry: &mut NodeRegistry,
        parent: NodeId,
        name: &str,
    ) -> Result<NodeId, OperationError> {
        let block = self.blocks.allocate()?;
        match registry.allocate(Some(parent), name, NodeKind::File, Some(block)) {
            Ok(id) => Ok(id),
            Err(err) => {
                // A failed create must leave no orphan block behind.
                let _ = self.blocks.release(block);
                Err(err.into())
            }
        }
    }

    /// Creates a directory entry; directories carry no block
    pub fn create_directory(
        &self,
        registry: &mut NodeRegistry,
        parent: NodeId,
        name: &str,
    ) -> Result<NodeId, OperationError> {
        Ok(registry.allocate(Some(parent), name, NodeKind::Directory, None)?)
    }

    /// Adds a new name sharing an existing file's content block
    ///
    /// No content is copied; the block's link count grows by one.
    pub fn link(
        &self,
        registry: &mut NodeRegistry,
        existing: NodeId,
        new_parent: NodeId,
        new_name: &str,
    ) -> Result<NodeId, OperationError> {
        let node = registry
            .find_by_id(existing)
            .ok_or_else(|| OperationError::NotFound(existing.to_string()))?;
        let block = node.block.ok_or_else(|| {
            OperationError::InvalidArgument(format!("{existing} is a directory, cannot hard-link"))
        })?;

        self.blocks.retain(block)?;
        match registry.allocate(Some(new_parent), new_name, NodeKind::File, Some(block)) {
            Ok(id) => {
                debug!("link: {existing} now shared as {id} ({new_name})");
                Ok(id)
            }
            Err(err) => {
                let _ = self.blocks.release(block);
                Err(err.into())
            }
        }
    }

    /// Removes a file entry; the block is freed with the last link
    ///
    /// `expected` guards against a stale caller-held handle: when given and
    /// the resolved entry is a different node, nothing is removed.
    pub fn unlink(
        &self,
        registry: &mut NodeRegistry,
        parent: NodeId,
        name: &str,
        expected: Option<NodeId>,
    ) -> Result<(), OperationError> {
        let node = registry
            .find_by_name(parent, name)
            .ok_or_else(|| OperationError::NotFound(name.to_string()))?;
        if node.is_directory() {
            return Err(OperationError::InvalidArgument(format!(
                "{name} is a directory, use rmdir"
            )));
        }
        if let Some(expected) = expected {
            if node.id != expected {
                warn!("unlink: {name} resolves to {}, caller expected {expected}", node.id);
                return Err(OperationError::Inconsistent(format!(
                    "{name} resolves to {}, expected {expected}",
                    node.id
                )));
            }
        }

        let id = node.id;
        let block = node.block;
        registry.remove(id)?;
        if let Some(block) = block {
            let freed = self.blocks.release(block)?;
            if freed {
                debug!("unlink: {id} was the last link, {block} freed");
            }
        }
        Ok(())
    }

    /// Removes an empty directory entry
    pub fn rmdir(
        &self,
        registry: &mut NodeRegistry,
        parent: NodeId,
        name: &str,
    ) -> Result<(), OperationError> {
        let node = registry
            .find_by_name(parent, name)
            .ok_or_else(|| OperationError::NotFound(name.to_string()))?;
        if !node.is_directory() {
            return Err(OperationError::InvalidArgument(format!(
                "{name} is not a directory"
            )));
        }
        if registry.child_count(node.id) > 0 {
            return Err(OperationError::DirectoryNotEmpty(name.to_string()));
        }

        let id = node.id;
        registry.remove(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_types::FIRST_NODE_ID;

    fn setup() -> (LinkManager, NodeRegistry, NodeId) {
        let links = LinkManager::new(None);
        let mut registry = NodeRegistry::new(None);
        let root = registry
            .allocate(None, "/", NodeKind::Directory, None)
            .unwrap();
        (links, registry, root)
    }

    #[test]
    fn test_create_file_allocates_block() {
        let (links, mut registry, root) = setup();
        let id = links.create_file(&mut registry, root, "a.txt").unwrap();

        assert_eq!(links.blocks().len(), 1);
        let block = registry.find_by_id(id).unwrap().block.unwrap();
        assert_eq!(links.blocks().link_count(block).unwrap(), 1);
    }

    #[test]
    fn test_failed_create_leaves_no_orphan_block() {
        let (links, mut registry, root) = setup();
        links.create_file(&mut registry, root, "a.txt").unwrap();

        let result = links.create_file(&mut registry, root, "a.txt");
        assert!(matches!(result, Err(OperationError::AlreadyExists(_))));
        assert_eq!(links.blocks().len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_link_shares_block() {
        let (links, mut registry, root) = setup();
        let a = links.create_file(&mut registry, root, "a").unwrap();
        let b = links.link(&mut registry, a, root, "b").unwrap();

        let block_a = registry.find_by_id(a).unwrap().block.unwrap();
        let block_b = registry.find_by_id(b).unwrap().block.unwrap();
        assert_eq!(block_a, block_b);
        assert_eq!(links.blocks().link_count(block_a).unwrap(), 2);
        assert_eq!(links.blocks().len(), 1);
    }

    #[test]
    fn test_link_to_directory_fails() {
        let (links, mut registry, root) = setup();
        let dir = links.create_directory(&mut registry, root, "docs").unwrap();

        let result = links.link(&mut registry, dir, root, "alias");
        assert!(matches!(result, Err(OperationError::InvalidArgument(_))));
    }

    #[test]
    fn test_link_to_missing_node_fails() {
        let (links, mut registry, root) = setup();
        let ghost = FIRST_NODE_ID.next().next();
        let result = links.link(&mut registry, ghost, root, "alias");
        assert!(matches!(result, Err(OperationError::NotFound(_))));
    }

    #[test]
    fn test_unlink_last_link_frees_block() {
        let (links, mut registry, root) = setup();
        links.create_file(&mut registry, root, "a").unwrap();

        links.unlink(&mut registry, root, "a", None).unwrap();
        assert!(links.blocks().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unlink_keeps_shared_block() {
        let (links, mut registry, root) = setup();
        let a = links.create_file(&mut registry, root, "a").unwrap();
        links.link(&mut registry, a, root, "b").unwrap();

        links.unlink(&mut registry, root, "a", Some(a)).unwrap();
        assert_eq!(links.blocks().len(), 1);
        assert!(registry.find_by_name(root, "b").is_some());
    }

    #[test]
    fn test_unlink_expected_mismatch() {
        let (links, mut registry, root) = setup();
        let a = links.create_file(&mut registry, root, "a").unwrap();

        let stale = a.next();
        let result = links.unlink(&mut registry, root, "a", Some(stale));
        assert!(matches!(result, Err(OperationError::Inconsistent(_))));
        // Nothing was removed.
        assert!(registry.find_by_name(root, "a").is_some());
        assert_eq!(links.blocks().len(), 1);
    }

    #[test]
    fn test_unlink_directory_rejected() {
        let (links, mut registry, root) = setup();
        links.create_directory(&mut registry, root, "docs").unwrap();

        let result = links.unlink(&mut registry, root, "docs", None);
        assert!(matches!(result, Err(OperationError::InvalidArgument(_))));
    }

    #[test]
    fn test_rmdir_requires_empty() {
        let (links, mut registry, root) = setup();
        let docs = links.create_directory(&mut registry, root, "docs").unwrap();
        links.create_file(&mut registry, docs, "inner").unwrap();

        let result = links.rmdir(&mut registry, root, "docs");
        assert!(matches!(result, Err(OperationError::DirectoryNotEmpty(_))));

        links.unlink(&mut registry, docs, "inner", None).unwrap();
        links.rmdir(&mut registry, root, "docs").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rmdir_of_file_rejected() {
        let (links, mut registry, root) = setup();
        links.create_file(&mut registry, root, "a").unwrap();

        let result = links.rmdir(&mut registry, root, "a");
        assert!(matches!(result, Err(OperationError::InvalidArgument(_))));
    }
}
