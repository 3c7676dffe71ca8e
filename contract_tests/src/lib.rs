//! # Service Contract Tests
//!
//! This crate provides "golden" tests for the file store's public contract
//! to ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the verb contract is written as code
//! - **Testability first**: contract tests fail when observable behavior
//!   or wire shapes change
//! - **Both policies are contracts**: rejecting and shadowing duplicate
//!   names are each pinned by their own tests
//!
//! ## Structure
//!
//! - `file_store`: behavioral properties of the verb set, including the
//!   hard-link lifetime model and concurrent structural calls
//! - `wire`: serde shapes of the records the host consumes

pub mod file_store;
pub mod wire;

/// Common test helpers for contract validation
pub mod test_helpers {
    use services_file_store::{DuplicatePolicy, FileStoreService, StoreConfig};

    /// Mounts a volume with the default (rejecting) configuration
    pub fn mount_default() -> FileStoreService {
        FileStoreService::mount(StoreConfig::default()).expect("mount with default config")
    }

    /// Mounts a volume with the shadowing duplicate policy
    pub fn mount_shadowing() -> FileStoreService {
        FileStoreService::mount(StoreConfig::with_policy(DuplicatePolicy::Shadow))
            .expect("mount with shadow config")
    }
}
