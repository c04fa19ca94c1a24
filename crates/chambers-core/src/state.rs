//! Per-session narrative state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// The durable record of one user's traversal of one narrative.
///
/// Mutated only by the engine, one transition at a time, and never once
/// `terminal` is set; a replay creates a fresh state instead of resetting
/// this one. The variables map is a `BTreeMap` so serialization is
/// deterministic regardless of patch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeState {
    /// The node the session currently rests on.
    pub current_node_id: NodeId,
    /// Narrative variables accumulated from choice patches.
    pub variables: BTreeMap<String, serde_json::Value>,
    /// Nodes reached at least once, in first-visit order, no duplicates.
    pub visited_nodes: Vec<NodeId>,
    /// Accumulated progress score. Never decreases.
    pub progress_score: u32,
    /// Whether the session has reached a completion node.
    pub terminal: bool,
    /// Optimistic concurrency counter, incremented on every transition.
    pub version: i64,
}

impl NarrativeState {
    /// Creates the state for a newly started session resting on the
    /// narrative's start node.
    #[must_use]
    pub fn fresh(start_node_id: NodeId) -> Self {
        Self {
            current_node_id: start_node_id,
            variables: BTreeMap::new(),
            visited_nodes: Vec::new(),
            progress_score: 0,
            terminal: false,
            version: 1,
        }
    }

    /// True if the node has been reached at least once in this session.
    #[must_use]
    pub fn has_visited(&self, node_id: &NodeId) -> bool {
        self.visited_nodes.contains(node_id)
    }

    /// Appends a node to the visited sequence unless already present,
    /// preserving first-visit order.
    pub fn record_visit(&mut self, node_id: NodeId) {
        if !self.has_visited(&node_id) {
            self.visited_nodes.push(node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_starts_at_start_node_with_version_one() {
        let state = NarrativeState::fresh(NodeId::new("opening"));

        assert_eq!(state.current_node_id, NodeId::new("opening"));
        assert!(state.variables.is_empty());
        assert!(state.visited_nodes.is_empty());
        assert_eq!(state.progress_score, 0);
        assert!(!state.terminal);
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_record_visit_is_idempotent_and_ordered() {
        let mut state = NarrativeState::fresh(NodeId::new("a"));

        state.record_visit(NodeId::new("a"));
        state.record_visit(NodeId::new("b"));
        state.record_visit(NodeId::new("a"));
        state.record_visit(NodeId::new("c"));

        assert_eq!(
            state.visited_nodes,
            vec![NodeId::new("a"), NodeId::new("b"), NodeId::new("c")]
        );
    }
}
