//! Test repositories — `StateRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use chambers_core::error::NarrativeError;
use chambers_core::ids::SessionKey;
use chambers_core::repository::StateRepository;
use chambers_core::state::NarrativeState;

/// A fully functional in-memory state store with real optimistic
/// concurrency checks. Doubles as the reference implementation of the
/// repository contract.
#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    states: Mutex<HashMap<SessionKey, NarrativeState>>,
}

impl InMemoryStateRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn get(&self, key: &SessionKey) -> Result<Option<NarrativeState>, NarrativeError> {
        Ok(self.states.lock().unwrap().get(key).cloned())
    }

    async fn put(
        &self,
        key: &SessionKey,
        state: &NarrativeState,
        expected_version: i64,
    ) -> Result<(), NarrativeError> {
        let mut states = self.states.lock().unwrap();
        let actual = states.get(key).map_or(0, |existing| existing.version);
        if actual != expected_version {
            return Err(NarrativeError::Conflict {
                key: key.clone(),
                expected: expected_version,
                actual,
            });
        }
        states.insert(key.clone(), state.clone());
        Ok(())
    }
}

/// A repository that always fails with `PersistenceFailure`. Useful for
/// exercising I/O error paths.
#[derive(Debug, Default)]
pub struct FailingStateRepository;

#[async_trait]
impl StateRepository for FailingStateRepository {
    async fn get(&self, _key: &SessionKey) -> Result<Option<NarrativeState>, NarrativeError> {
        Err(NarrativeError::PersistenceFailure("connection refused".into()))
    }

    async fn put(
        &self,
        _key: &SessionKey,
        _state: &NarrativeState,
        _expected_version: i64,
    ) -> Result<(), NarrativeError> {
        Err(NarrativeError::PersistenceFailure("connection refused".into()))
    }
}

/// A repository that serves a configured state from `get` but rejects
/// every `put` with `Conflict`, as if another writer always got there
/// first.
#[derive(Debug)]
pub struct StaleStateRepository {
    state: NarrativeState,
}

impl StaleStateRepository {
    /// Creates a repository that serves `state` from every `get`.
    #[must_use]
    pub fn new(state: NarrativeState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl StateRepository for StaleStateRepository {
    async fn get(&self, _key: &SessionKey) -> Result<Option<NarrativeState>, NarrativeError> {
        Ok(Some(self.state.clone()))
    }

    async fn put(
        &self,
        key: &SessionKey,
        _state: &NarrativeState,
        expected_version: i64,
    ) -> Result<(), NarrativeError> {
        Err(NarrativeError::Conflict {
            key: key.clone(),
            expected: expected_version,
            actual: expected_version + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chambers_core::ids::{ChamberId, CharacterArchetype, NodeId, UserId};

    fn key() -> SessionKey {
        SessionKey::new(
            UserId::new("u1"),
            ChamberId::new("emotional_processing"),
            CharacterArchetype::new("compassionate_friend"),
        )
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips_all_fields() {
        // Arrange
        let repo = InMemoryStateRepository::new();
        let mut state = NarrativeState::fresh(NodeId::new("opening"));
        state.record_visit(NodeId::new("opening"));
        state.progress_score = 10;
        state
            .variables
            .insert("path".into(), serde_json::json!("gentle"));

        // Act
        repo.put(&key(), &state, 0).await.unwrap();
        let loaded = repo.get(&key()).await.unwrap();

        // Assert
        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn test_put_with_wrong_expected_version_conflicts() {
        // Arrange
        let repo = InMemoryStateRepository::new();
        let state = NarrativeState::fresh(NodeId::new("opening"));
        repo.put(&key(), &state, 0).await.unwrap();

        // Act: second create attempt against the same key.
        let err = repo.put(&key(), &state, 0).await.unwrap_err();

        // Assert
        match err {
            NarrativeError::Conflict { expected, actual, .. } => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_conflicting_put_stores_nothing() {
        // Arrange
        let repo = InMemoryStateRepository::new();
        let state = NarrativeState::fresh(NodeId::new("opening"));
        repo.put(&key(), &state, 0).await.unwrap();

        let mut newer = state.clone();
        newer.version = 5;
        newer.progress_score = 99;

        // Act
        let result = repo.put(&key(), &newer, 3).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(repo.get(&key()).await.unwrap(), Some(state));
    }
}
