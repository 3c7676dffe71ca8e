//! Wire-shape contract tests
//!
//! The host consumes these records across its integration boundary; their
//! serialized shapes are part of the contract and pinned here.
