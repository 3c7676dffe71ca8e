//! File store behavior contract tests
//!
//! These tests pin the observable semantics of the verb set: lookup after
//! create, listing completeness, content round trips, capacity truncation,
//! hard-link lifetime, both duplicate policies, and structural verbs under
//! concurrent callers.
