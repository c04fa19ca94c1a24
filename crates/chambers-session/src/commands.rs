//! Commands accepted by the session manager.

use uuid::Uuid;

use chambers_core::ids::{ChamberId, CharacterArchetype, ChoiceId, SessionKey, UserId};

/// Starts a narrative session, or resumes a non-terminal one.
#[derive(Debug, Clone)]
pub struct StartNarrative {
    /// Correlation id to trace this command through the system.
    pub correlation_id: Uuid,
    /// The user starting the session.
    pub user_id: UserId,
    /// The chamber hosting the narrative.
    pub chamber_id: ChamberId,
    /// The character leading the narrative.
    pub archetype: CharacterArchetype,
}

impl StartNarrative {
    /// The persistence key this command addresses.
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(
            self.user_id.clone(),
            self.chamber_id.clone(),
            self.archetype.clone(),
        )
    }
}

/// Advances a session one step, selecting a choice when the current node
/// offers one.
#[derive(Debug, Clone)]
pub struct AdvanceNarrative {
    /// Correlation id to trace this command through the system.
    pub correlation_id: Uuid,
    /// The user advancing the session.
    pub user_id: UserId,
    /// The chamber hosting the narrative.
    pub chamber_id: ChamberId,
    /// The character leading the narrative.
    pub archetype: CharacterArchetype,
    /// The selected choice; required exactly at choice nodes.
    pub choice_id: Option<ChoiceId>,
}

impl AdvanceNarrative {
    /// The persistence key this command addresses.
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(
            self.user_id.clone(),
            self.chamber_id.clone(),
            self.archetype.clone(),
        )
    }
}
