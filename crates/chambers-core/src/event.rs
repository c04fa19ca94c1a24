//! Events emitted by a narrative transition.

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// Emitted when a session moves to a non-terminal node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeAdvanced {
    /// The node the session left.
    pub from: NodeId,
    /// The node the session now rests on.
    pub to: NodeId,
}

/// Emitted when a session enters a completion node and becomes terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeCompleted {
    /// The completion node that ended the session.
    pub completion_node_id: NodeId,
    /// The final accumulated progress score.
    pub final_score: u32,
}

/// Event variants a single transition can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeEvent {
    /// The session advanced to a non-terminal node.
    Advanced(NarrativeAdvanced),
    /// The session reached a completion node.
    Completed(NarrativeCompleted),
}

impl NarrativeEvent {
    /// Returns the event type name (used for logging and routing).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Advanced(_) => "narrative.advanced",
            Self::Completed(_) => "narrative.completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let advanced = NarrativeEvent::Advanced(NarrativeAdvanced {
            from: NodeId::new("a"),
            to: NodeId::new("b"),
        });
        let completed = NarrativeEvent::Completed(NarrativeCompleted {
            completion_node_id: NodeId::new("end"),
            final_score: 70,
        });

        assert_eq!(advanced.event_type(), "narrative.advanced");
        assert_eq!(completed.event_type(), "narrative.completed");
    }
}
