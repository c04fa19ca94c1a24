//! Downstream progress-tracking collaborator abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::event::NarrativeEvent;
use crate::ids::SessionKey;
use crate::state::NarrativeState;

/// The record handed to progress-tracking and telemetry collaborators
/// after a transition has been committed.
#[derive(Debug, Clone)]
pub struct ProgressRecord {
    /// Correlation id of the command that caused the transition.
    pub correlation_id: Uuid,
    /// The session the transition belongs to.
    pub key: SessionKey,
    /// The event the transition emitted.
    pub event: NarrativeEvent,
    /// The committed state after the transition.
    pub state: NarrativeState,
    /// The score awarded by this transition.
    pub score_delta: u32,
    /// When the record was dispatched.
    pub occurred_at: DateTime<Utc>,
}

/// Error a sink may return. Sink failures never fail the transition that
/// produced the record; the session layer logs and moves on.
#[derive(Debug, Error)]
#[error("progress sink failure: {0}")]
pub struct SinkError(pub String);

/// Trait for downstream consumers of committed transitions.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Receives one committed transition record.
    async fn record(&self, record: &ProgressRecord) -> Result<(), SinkError>;
}
