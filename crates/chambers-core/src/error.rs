//! Domain error types.

use std::fmt;

use thiserror::Error;

use crate::ids::{ChoiceId, NodeId, SessionKey};

/// A single content-integrity violation found while validating a narrative
/// definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionDefect {
    /// The descriptor could not be deserialized at all.
    #[error("descriptor could not be parsed: {0}")]
    Malformed(String),

    /// The declared start node is not present in the node map.
    #[error("start node '{0}' is not defined")]
    UnknownStartNode(NodeId),

    /// A dialogue or insight node advances to a node that does not exist.
    #[error("node '{node_id}' advances to undefined node '{target}'")]
    DanglingNextTarget {
        /// The node carrying the reference.
        node_id: NodeId,
        /// The missing target.
        target: NodeId,
    },

    /// A choice targets a node that does not exist.
    #[error("choice '{choice_id}' on node '{node_id}' targets undefined node '{target}'")]
    DanglingChoiceTarget {
        /// The node offering the choice.
        node_id: NodeId,
        /// The offending choice.
        choice_id: ChoiceId,
        /// The missing target.
        target: NodeId,
    },

    /// A declared completion id is not present in the node map.
    #[error("completion id '{0}' is not defined")]
    UnknownCompletionId(NodeId),

    /// A declared completion id names a node that is not a completion node.
    #[error("completion id '{0}' does not name a completion node")]
    NotACompletionNode(NodeId),

    /// A choice node offers no choices.
    #[error("choice node '{0}' offers no choices")]
    NoChoices(NodeId),

    /// Two choices on the same node share an id.
    #[error("choice id '{choice_id}' appears more than once on node '{node_id}'")]
    DuplicateChoiceId {
        /// The node offering the choices.
        node_id: NodeId,
        /// The duplicated id.
        choice_id: ChoiceId,
    },

    /// A node has no outgoing edge and is not a completion node. A session
    /// reaching it could never finish.
    #[error("node '{0}' has no viable exit")]
    DeadEnd(NodeId),
}

/// Every defect found in one definition, collected so authors see the full
/// list rather than the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionDefects(pub Vec<DefinitionDefect>);

impl fmt::Display for DefinitionDefects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, defect) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{defect}")?;
        }
        Ok(())
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The definition violates a content-integrity invariant. Detected at
    /// load time, never mid-session, and never silently recovered.
    #[error("invalid narrative definition: {0}")]
    DefinitionInvalid(DefinitionDefects),

    /// An unknown definition or session key.
    #[error("not found: {0}")]
    NotFound(String),

    /// The supplied choice id is not offered by the current node.
    #[error("node '{node_id}' does not offer choice '{choice_id}'")]
    InvalidChoice {
        /// The current node.
        node_id: NodeId,
        /// The rejected choice id.
        choice_id: ChoiceId,
    },

    /// A choice was supplied where none was expected, omitted where one was
    /// required, or an operation was attempted on a terminal session.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Optimistic version mismatch. Retryable: reload and reapply.
    #[error("version conflict on {key}: expected version {expected}, found {actual}")]
    Conflict {
        /// The session key the conflict occurred on.
        key: SessionKey,
        /// The version the caller loaded.
        expected: i64,
        /// The version actually persisted.
        actual: i64,
    },

    /// An I/O error from the external store. Retryable per caller policy.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl NarrativeError {
    /// True for the error kinds a caller may meaningfully retry. Content
    /// and validation errors are deliberately excluded.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::PersistenceFailure(_)
        )
    }
}
