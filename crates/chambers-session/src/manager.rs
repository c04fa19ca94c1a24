//! Session orchestration: load, advance, persist, dispatch.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use chambers_content::store::NarrativeDirectory;
use chambers_core::clock::Clock;
use chambers_core::error::NarrativeError;
use chambers_core::ids::SessionKey;
use chambers_core::repository::StateRepository;
use chambers_core::sink::{ProgressRecord, ProgressSink};
use chambers_core::state::NarrativeState;
use chambers_engine::{NarrativeEngine, Transition};
use uuid::Uuid;

use crate::commands::{AdvanceNarrative, StartNarrative};

/// Orchestrates narrative sessions for all users. Holds no per-session
/// state of its own; operations on distinct session keys are fully
/// independent.
pub struct SessionManager {
    directory: Arc<dyn NarrativeDirectory>,
    repository: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
    engine: NarrativeEngine,
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl SessionManager {
    /// Creates a manager with the default engine and no sinks.
    #[must_use]
    pub fn new(
        directory: Arc<dyn NarrativeDirectory>,
        repository: Arc<dyn StateRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            repository,
            clock,
            engine: NarrativeEngine::default(),
            sinks: Vec::new(),
        }
    }

    /// Replaces the engine, e.g. to supply tuned scoring constants.
    #[must_use]
    pub fn with_engine(mut self, engine: NarrativeEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Registers a downstream consumer of committed transitions.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Starts a session, or resumes it if a non-terminal state is already
    /// persisted for the key. A terminal state is left untouched and a
    /// fresh replay state is persisted in its place.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the character is not supported in the
    /// chamber, `Conflict` when another caller created or replaced the
    /// session concurrently, and `PersistenceFailure` for store I/O
    /// errors.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id, key = %command.key()))]
    pub async fn start(&self, command: &StartNarrative) -> Result<NarrativeState, NarrativeError> {
        if !self
            .directory
            .supports(&command.chamber_id, &command.archetype)
        {
            return Err(NarrativeError::NotFound(format!(
                "character '{}' is not supported in chamber '{}'",
                command.archetype, command.chamber_id
            )));
        }
        let definition = self.directory.get(&command.chamber_id, &command.archetype)?;
        let key = command.key();

        let expected_version = match self.repository.get(&key).await? {
            Some(existing) if !existing.terminal => {
                info!(version = existing.version, "resuming narrative session");
                return Ok(existing);
            }
            // Completed earlier: replay with a fresh state.
            Some(existing) => existing.version,
            None => 0,
        };

        let state = NarrativeState::fresh(definition.start_node_id.clone());
        self.repository.put(&key, &state, expected_version).await?;
        info!(start_node = %state.current_node_id, "started narrative session");
        Ok(state)
    }

    /// Advances the session one step and commits the result. Events reach
    /// the registered sinks only after the state is persisted; on any
    /// failure nothing is dispatched and nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown definition or session key, the
    /// engine's `InvalidOperation`/`InvalidChoice` errors unchanged,
    /// `Conflict` when the persisted version moved under the caller
    /// (reload and retry), and `PersistenceFailure` for store I/O errors.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id, key = %command.key()))]
    pub async fn process_choice(
        &self,
        command: &AdvanceNarrative,
    ) -> Result<NarrativeState, NarrativeError> {
        let definition = self.directory.get(&command.chamber_id, &command.archetype)?;
        let key = command.key();

        let current = self.repository.get(&key).await?.ok_or_else(|| {
            NarrativeError::NotFound(format!("no session exists for {key}"))
        })?;
        let loaded_version = current.version;

        let transition = self
            .engine
            .advance(&definition, &current, command.choice_id.as_ref())?;

        self.repository
            .put(&key, &transition.state, loaded_version)
            .await?;

        info!(
            event = transition.event.event_type(),
            score_delta = transition.score_delta,
            node = %transition.state.current_node_id,
            "committed narrative transition"
        );

        self.dispatch(command.correlation_id, &key, &transition)
            .await;
        Ok(transition.state)
    }

    /// Hands one committed transition to every registered sink. Sink
    /// failures are logged and swallowed so collaborator availability
    /// never affects the session.
    async fn dispatch(&self, correlation_id: Uuid, key: &SessionKey, transition: &Transition) {
        if self.sinks.is_empty() {
            return;
        }
        let record = ProgressRecord {
            correlation_id,
            key: key.clone(),
            event: transition.event.clone(),
            state: transition.state.clone(),
            score_delta: transition.score_delta,
            occurred_at: self.clock.now(),
        };
        for sink in &self.sinks {
            if let Err(error) = sink.record(&record).await {
                warn!(%error, "progress sink rejected record");
            }
        }
    }
}
