//! File Store Service implementation
//!
//! One `FileStoreService` is one mounted volume. The registry sits behind a
//! single read/write lock (structural verbs take it exclusively); content
//! reads and writes only hold it long enough to resolve the block, then run
//! under the block's own lock.

use crate::config::{DuplicatePolicy, StoreConfig};
use crate::links::LinkManager;
use crate::operations::{DirEntryRecord, FileStoreOperations, OperationError, StatRecord};
use fs_types::{validate_name, BlockId, NodeId, NodeKind, VolumeId};
use log::{debug, warn};
use node_registry::NodeRegistry;
use std::sync::RwLock;

/// The file store core behind the host's verb set
pub struct FileStoreService {
    registry: RwLock<NodeRegistry>,
    links: LinkManager,
    config: StoreConfig,
    volume: VolumeId,
    root: NodeId,
}

impl FileStoreService {
    /// Mounts a fresh volume: empty registry, a root directory, no blocks
    pub fn mount(config: StoreConfig) -> Result<Self, OperationError> {
        let mut registry = NodeRegistry::new(config.max_nodes);
        let root = registry.allocate(None, "/", NodeKind::Directory, None)?;

        let volume = VolumeId::new();
        debug!("mount: {volume}, root {root}");

        Ok(Self {
            registry: RwLock::new(registry),
            links: LinkManager::new(config.max_blocks),
            config,
            volume,
            root,
        })
    }

    /// The volume id of this mounted instance
    pub fn volume(&self) -> VolumeId {
        self.volume
    }

    /// The active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.registry.read().unwrap().len()
    }

    /// Number of live content blocks
    pub fn block_count(&self) -> usize {
        self.links.blocks().len()
    }

    /// Resolves a node that must be a directory
    fn require_directory(
        registry: &NodeRegistry,
        id: NodeId,
    ) -> Result<(), OperationError> {
        let node = registry
            .find_by_id(id)
            .ok_or_else(|| OperationError::NotFound(id.to_string()))?;
        if !node.is_directory() {
            return Err(OperationError::InvalidArgument(format!(
                "{id} is not a directory"
            )));
        }
        Ok(())
    }

    /// Resolves a node that must be a file, returning its block
    fn require_file_block(
        registry: &NodeRegistry,
        id: NodeId,
    ) -> Result<BlockId, OperationError> {
        let node = registry
            .find_by_id(id)
            .ok_or_else(|| OperationError::NotFound(id.to_string()))?;
        node.block.ok_or_else(|| {
            OperationError::InvalidArgument(format!("{id} is not a file"))
        })
    }

    /// Applies the duplicate policy to an already-bound (parent, name)
    ///
    /// Under `Reject` an existing binding fails the verb; under `Shadow` an
    /// existing file binding is released so the new entry can take the name.
    /// Directory bindings are never displaced.
    fn clear_binding(
        &self,
        registry: &mut NodeRegistry,
        parent: NodeId,
        name: &str,
    ) -> Result<(), OperationError> {
        let Some(node) = registry.find_by_name(parent, name) else {
            return Ok(());
        };
        match self.config.duplicate_policy {
            DuplicatePolicy::Reject => Err(OperationError::AlreadyExists(name.to_string())),
            DuplicatePolicy::Shadow => {
                if node.is_directory() {
                    return Err(OperationError::AlreadyExists(name.to_string()));
                }
                debug!("shadow: displacing {} ({name})", node.id);
                self.links.unlink(registry, parent, name, None)
            }
        }
    }
}

impl FileStoreOperations for FileStoreService {
    fn root(&self) -> NodeId {
        self.root
    }

    fn lookup(
        &self,
        parent: NodeId,
        name: &str,
    ) -> Result<Option<DirEntryRecord>, OperationError> {
        let registry = self.registry.read().unwrap();
        Self::require_directory(&registry, parent)?;
        Ok(registry.find_by_name(parent, name).map(DirEntryRecord::from))
    }

    fn iterate(&self, dir: NodeId, cursor: usize) -> Result<Vec<DirEntryRecord>, OperationError> {
        let registry = self.registry.read().unwrap();
        Self::require_directory(&registry, dir)?;
        Ok(registry
            .children_of(dir)
            .skip(cursor)
            .map(DirEntryRecord::from)
            .collect())
    }

    fn create(&self, parent: NodeId, name: &str, mode: u32) -> Result<NodeId, OperationError> {
        debug!("create: parent {parent}, name {name}, mode {mode:o}");
        validate_name(name)?;

        let mut registry = self.registry.write().unwrap();
        Self::require_directory(&registry, parent)?;
        self.clear_binding(&mut registry, parent, name)?;
        self.links.create_file(&mut registry, parent, name)
    }

    fn mkdir(&self, parent: NodeId, name: &str, mode: u32) -> Result<NodeId, OperationError> {
        debug!("mkdir: parent {parent}, name {name}, mode {mode:o}");
        validate_name(name)?;

        let mut registry = self.registry.write().unwrap();
        Self::require_directory(&registry, parent)?;
        self.clear_binding(&mut registry, parent, name)?;
        self.links.create_directory(&mut registry, parent, name)
    }

    fn unlink(
        &self,
        parent: NodeId,
        name: &str,
        expected: Option<NodeId>,
    ) -> Result<(), OperationError> {
        debug!("unlink: parent {parent}, name {name}");

        let mut registry = self.registry.write().unwrap();
        Self::require_directory(&registry, parent)?;
        self.links.unlink(&mut registry, parent, name, expected)
    }

    fn rmdir(&self, parent: NodeId, name: &str) -> Result<(), OperationError> {
        debug!("rmdir: parent {parent}, name {name}");

        let mut registry = self.registry.write().unwrap();
        Self::require_directory(&registry, parent)?;
        self.links.rmdir(&mut registry, parent, name)
    }

    fn read(&self, file: NodeId, offset: usize, len: usize) -> Result<Vec<u8>, OperationError> {
        let block = {
            let registry = self.registry.read().unwrap();
            Self::require_file_block(&registry, file)?
        };
        Ok(self.links.blocks().read(block, offset, len)?)
    }

    fn write(&self, file: NodeId, offset: usize, data: &[u8]) -> Result<usize, OperationError> {
        let block = {
            let registry = self.registry.read().unwrap();
            Self::require_file_block(&registry, file)?
        };
        let stored = self.links.blocks().write(block, offset, data)?;
        if stored < data.len() {
            warn!(
                "write: {file} truncated at capacity, {stored} of {} bytes stored",
                data.len()
            );
        }
        Ok(stored)
    }

    fn link(
        &self,
        existing: NodeId,
        new_parent: NodeId,
        new_name: &str,
    ) -> Result<NodeId, OperationError> {
        debug!("link: {existing} as {new_name} under {new_parent}");
        validate_name(new_name)?;

        let mut registry = self.registry.write().unwrap();
        Self::require_directory(&registry, new_parent)?;
        self.clear_binding(&mut registry, new_parent, new_name)?;
        self.links.link(&mut registry, existing, new_parent, new_name)
    }

    fn stat(&self, node: NodeId) -> Result<StatRecord, OperationError> {
        let registry = self.registry.read().unwrap();
        let record = registry
            .find_by_id(node)
            .ok_or_else(|| OperationError::NotFound(node.to_string()))?;

        let (size, links, children) = match record.block {
            Some(block) => (
                Some(self.links.blocks().size_of(block)?),
                Some(self.links.blocks().link_count(block)?),
                None,
            ),
            None => (None, None, Some(registry.child_count(node))),
        };

        Ok(StatRecord {
            id: record.id,
            kind: record.kind,
            size,
            links,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_blocks::BLOCK_CAPACITY;

    fn mount_default() -> FileStoreService {
        FileStoreService::mount(StoreConfig::default()).unwrap()
    }

    #[test]
    fn test_mount_creates_root() {
        let store = mount_default();
        let root = store.root();

        assert_eq!(store.node_count(), 1);
        assert_eq!(store.block_count(), 0);
        let stat = store.stat(root).unwrap();
        assert_eq!(stat.kind, NodeKind::Directory);
        assert_eq!(stat.children, Some(0));
    }

    #[test]
    fn test_create_then_lookup() {
        let store = mount_default();
        let root = store.root();
        let id = store.create(root, "notes.txt", 0o644).unwrap();

        let entry = store.lookup(root, "notes.txt").unwrap().unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.kind, NodeKind::File);
    }

    #[test]
    fn test_lookup_absent_is_none() {
        let store = mount_default();
        assert!(store.lookup(store.root(), "ghost").unwrap().is_none());
    }

    #[test]
    fn test_lookup_under_missing_parent() {
        let store = mount_default();
        let ghost = store.root().next();
        let result = store.lookup(ghost, "x");
        assert!(matches!(result, Err(OperationError::NotFound(_))));
    }

    #[test]
    fn test_iterate_yields_each_child_once() {
        let store = mount_default();
        let root = store.root();
        store.create(root, "c1", 0o644).unwrap();
        store.create(root, "c2", 0o644).unwrap();
        store.mkdir(root, "c3", 0o755).unwrap();

        let entries = store.iterate(root, 0).unwrap();
        assert_eq!(entries.len(), 3);
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_iterate_resumes_from_cursor() {
        let store = mount_default();
        let root = store.root();
        for name in ["a", "b", "c", "d"] {
            store.create(root, name, 0o644).unwrap();
        }

        let rest = store.iterate(root, 2).unwrap();
        assert_eq!(rest.len(), 2);
        let all = store.iterate(root, 0).unwrap();
        assert_eq!(&all[2..], &rest[..]);
    }

    #[test]
    fn test_iterate_over_file_fails() {
        let store = mount_default();
        let file = store.create(store.root(), "f", 0o644).unwrap();
        assert!(matches!(
            store.iterate(file, 0),
            Err(OperationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let store = mount_default();
        let file = store.create(store.root(), "data.bin", 0o644).unwrap();
        let payload = vec![0x5au8; 500];

        let written = store.write(file, 0, &payload).unwrap();
        assert_eq!(written, 500);
        assert_eq!(store.read(file, 0, 500).unwrap(), payload);
    }

    #[test]
    fn test_write_at_capacity_is_invalid() {
        let store = mount_default();
        let file = store.create(store.root(), "f", 0o644).unwrap();

        let result = store.write(file, BLOCK_CAPACITY, b"x");
        assert!(matches!(result, Err(OperationError::InvalidArgument(_))));
    }

    #[test]
    fn test_oversized_write_reports_stored_bytes() {
        let store = mount_default();
        let file = store.create(store.root(), "big", 0o644).unwrap();

        let written = store.write(file, 0, &vec![1u8; 2000]).unwrap();
        assert_eq!(written, BLOCK_CAPACITY);
        let stat = store.stat(file).unwrap();
        assert_eq!(stat.size, Some(BLOCK_CAPACITY));
    }

    #[test]
    fn test_read_on_directory_fails() {
        let store = mount_default();
        let dir = store.mkdir(store.root(), "docs", 0o755).unwrap();
        assert!(matches!(
            store.read(dir, 0, 10),
            Err(OperationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_link_preserves_content_across_unlink() {
        let store = mount_default();
        let root = store.root();
        let a = store.create(root, "a", 0o644).unwrap();
        store.write(a, 0, b"payload").unwrap();

        let b = store.link(a, root, "b").unwrap();
        store.unlink(root, "a", Some(a)).unwrap();

        assert_eq!(store.read(b, 0, 7).unwrap(), b"payload");
        assert_eq!(store.stat(b).unwrap().links, Some(1));

        store.unlink(root, "b", Some(b)).unwrap();
        assert!(matches!(
            store.read(b, 0, 7),
            Err(OperationError::NotFound(_))
        ));
        assert_eq!(store.block_count(), 0);
    }

    #[test]
    fn test_unlink_missing_leaves_count_unchanged() {
        let store = mount_default();
        let before = store.node_count();

        let result = store.unlink(store.root(), "ghost", None);
        assert!(matches!(result, Err(OperationError::NotFound(_))));
        assert_eq!(store.node_count(), before);
    }

    #[test]
    fn test_duplicate_create_rejected_by_default() {
        let store = mount_default();
        let root = store.root();
        store.create(root, "a", 0o644).unwrap();

        let result = store.create(root, "a", 0o644);
        assert!(matches!(result, Err(OperationError::AlreadyExists(_))));
    }

    #[test]
    fn test_shadow_policy_replaces_binding() {
        let store =
            FileStoreService::mount(StoreConfig::with_policy(DuplicatePolicy::Shadow)).unwrap();
        let root = store.root();

        let old = store.create(root, "a", 0o644).unwrap();
        store.write(old, 0, b"old").unwrap();
        let new = store.create(root, "a", 0o644).unwrap();

        assert_ne!(old, new);
        let entry = store.lookup(root, "a").unwrap().unwrap();
        assert_eq!(entry.id, new);
        // The displaced entry's block went with it.
        assert_eq!(store.block_count(), 1);
        assert!(matches!(
            store.read(old, 0, 3),
            Err(OperationError::NotFound(_))
        ));
    }

    #[test]
    fn test_shadow_policy_never_displaces_directories() {
        let store =
            FileStoreService::mount(StoreConfig::with_policy(DuplicatePolicy::Shadow)).unwrap();
        let root = store.root();
        store.mkdir(root, "docs", 0o755).unwrap();

        let result = store.create(root, "docs", 0o644);
        assert!(matches!(result, Err(OperationError::AlreadyExists(_))));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let store = mount_default();
        let root = store.root();

        assert!(matches!(
            store.create(root, "", 0o644),
            Err(OperationError::InvalidName(_))
        ));
        assert!(matches!(
            store.mkdir(root, "..", 0o755),
            Err(OperationError::InvalidName(_))
        ));
        assert!(matches!(
            store.create(root, "a/b", 0o644),
            Err(OperationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_node_limit_surfaces_as_out_of_memory() {
        let config = StoreConfig {
            max_nodes: Some(2),
            ..StoreConfig::default()
        };
        let store = FileStoreService::mount(config).unwrap();
        let root = store.root();
        store.create(root, "a", 0o644).unwrap();

        let result = store.create(root, "b", 0o644);
        assert!(matches!(result, Err(OperationError::OutOfMemory)));
        // The rejected create must not leak its block.
        assert_eq!(store.block_count(), 1);
    }

    #[test]
    fn test_mkdir_then_rmdir() {
        let store = mount_default();
        let root = store.root();
        let docs = store.mkdir(root, "docs", 0o755).unwrap();
        store.create(docs, "inner", 0o644).unwrap();

        assert!(matches!(
            store.rmdir(root, "docs"),
            Err(OperationError::DirectoryNotEmpty(_))
        ));

        store.unlink(docs, "inner", None).unwrap();
        store.rmdir(root, "docs").unwrap();
        assert!(store.lookup(root, "docs").unwrap().is_none());
    }

    #[test]
    fn test_stat_file_reports_size_and_links() {
        let store = mount_default();
        let root = store.root();
        let a = store.create(root, "a", 0o644).unwrap();
        store.write(a, 0, b"12345").unwrap();
        store.link(a, root, "b").unwrap();

        let stat = store.stat(a).unwrap();
        assert_eq!(stat.kind, NodeKind::File);
        assert_eq!(stat.size, Some(5));
        assert_eq!(stat.links, Some(2));
        assert_eq!(stat.children, None);
    }

    #[test]
    fn test_ids_are_monotone_across_removal() {
        let store = mount_default();
        let root = store.root();
        let a = store.create(root, "a", 0o644).unwrap();
        store.unlink(root, "a", None).unwrap();
        let b = store.create(root, "a", 0o644).unwrap();
        assert!(b > a);
    }
}
