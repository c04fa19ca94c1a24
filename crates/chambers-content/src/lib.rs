//! Chambers — Definition Store.
//!
//! Loads declarative narrative graph descriptors, validates every
//! content-integrity invariant eagerly, and serves immutable, shared
//! definitions to the session layer. A broken definition is rejected here
//! and can never be discovered mid-session.

pub mod descriptor;
pub mod graph;
pub mod store;
