//! # File Store Types
//!
//! This crate defines the shared vocabulary of the file store core.
//!
//! ## Philosophy
//!
//! - **Identifiers are explicit**: nodes and blocks are addressed by typed
//!   ids, never by raw integers or paths
//! - **Names are data, not authority**: a name is a validated directory entry
//!   label; resolution and permissions live in the host layer
//! - **No ambient state**: id allocation belongs to the registry that owns
//!   the records, not to this crate

pub mod ids;
pub mod kind;
pub mod name;

pub use ids::{BlockId, NodeId, VolumeId, FIRST_NODE_ID};
pub use kind::NodeKind;
pub use name::{validate_name, NameError, MAX_NAME_LENGTH};
