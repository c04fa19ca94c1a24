//! Chambers — Session Manager.
//!
//! Orchestrates a single user's narrative session: loads the definition
//! and the persisted state, invokes the engine, persists the result under
//! optimistic versioning, and hands committed transitions to registered
//! progress sinks. A call either fully commits or has no observable
//! effect.

pub mod commands;
pub mod manager;

pub use commands::{AdvanceNarrative, StartNarrative};
pub use manager::SessionManager;
