//! Persistence collaborator abstraction.

use async_trait::async_trait;

use crate::error::NarrativeError;
use crate::ids::SessionKey;
use crate::state::NarrativeState;

/// Repository trait for loading and storing session state with optimistic
/// concurrency.
///
/// Implementations live in the hosting application; the engine crates only
/// consume the contract.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Loads the state persisted under `key`, or `None` if no session
    /// exists for it.
    async fn get(&self, key: &SessionKey) -> Result<Option<NarrativeState>, NarrativeError>;

    /// Stores `state` under `key`, conditioned on the currently persisted
    /// version being `expected_version`. An `expected_version` of 0 means
    /// the key must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::Conflict` when the persisted version does
    /// not match, and `NarrativeError::PersistenceFailure` for I/O errors.
    /// Nothing is stored in either case.
    async fn put(
        &self,
        key: &SessionKey,
        state: &NarrativeState,
        expected_version: i64,
    ) -> Result<(), NarrativeError>;
}
