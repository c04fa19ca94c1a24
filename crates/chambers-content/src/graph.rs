//! The validated narrative graph model.
//!
//! Loosely shaped descriptor records become this closed set of node
//! variants, each carrying only the fields its behavior requires, so
//! dead ends and dangling references are detectable exhaustively at load
//! time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use chambers_core::ids::{ChamberId, CharacterArchetype, ChoiceId, NodeId};

/// A user-selectable branch option attached to a choice node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeChoice {
    /// Choice identifier, unique within its node.
    pub id: ChoiceId,
    /// The label presented to the user.
    pub label: String,
    /// The node selecting this choice leads to.
    pub target_node_id: NodeId,
    /// Variables written into session state when this choice is selected.
    #[serde(default)]
    pub variables_patch: BTreeMap<String, serde_json::Value>,
}

/// One atomic unit of narrative content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrativeNode {
    /// Character speech that advances automatically.
    Dialogue {
        /// The spoken content.
        content: String,
        /// The node the dialogue advances to.
        next_node_id: NodeId,
    },
    /// A branch point offering the user one or more choices.
    Choice {
        /// The prompt presented alongside the choices.
        content: String,
        /// The ordered branch options. Never empty in a valid graph.
        choices: Vec<NarrativeChoice>,
    },
    /// A reflective beat that advances automatically and scores a bonus.
    Insight {
        /// The insight content.
        content: String,
        /// The node the insight advances to.
        next_node_id: NodeId,
    },
    /// A terminal node. Entering it ends the session.
    Completion {
        /// The closing content.
        content: String,
    },
}

impl NarrativeNode {
    /// True for completion nodes.
    #[must_use]
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion { .. })
    }
}

/// An immutable, validated narrative graph for one (chamber, archetype)
/// pair. Created once at content-load time and shared read-only across all
/// sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamberNarrative {
    /// The chamber this narrative is embedded in.
    pub chamber_id: ChamberId,
    /// The character whose voice drives the dialogue.
    pub character_archetype: CharacterArchetype,
    /// All nodes of the graph, keyed by id.
    pub nodes: BTreeMap<NodeId, NarrativeNode>,
    /// Where a fresh session starts.
    pub start_node_id: NodeId,
    /// The declared terminal nodes.
    pub completion_node_ids: BTreeSet<NodeId>,
}

impl ChamberNarrative {
    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, node_id: &NodeId) -> Option<&NarrativeNode> {
        self.nodes.get(node_id)
    }

    /// Total number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
