//! Progress scoring rules.

use serde::{Deserialize, Serialize};

use chambers_content::graph::{ChamberNarrative, NarrativeNode};
use chambers_core::ids::NodeId;
use chambers_core::state::NarrativeState;

/// Tunable point constants. The exact numbers are configuration, not
/// invariants; what the engine guarantees is that scores never decrease,
/// revisits score zero, and fuller traversals never score less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points for the first visit to any node.
    pub base_points: u32,
    /// Extra points when the first-visited node is an insight.
    pub insight_bonus: u32,
    /// Upper bound of the completion bonus, awarded in proportion to how
    /// much of the graph the session covered.
    pub completion_bonus_max: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: 10,
            insight_bonus: 5,
            completion_bonus_max: 50,
        }
    }
}

/// Computes the score delta for one transition. Deterministic and
/// content-independent: only node types and the visited set matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressScorer {
    config: ScoringConfig,
}

impl ProgressScorer {
    /// Creates a scorer with the given constants.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Returns the points awarded for entering `target_node_id` from
    /// `prior_state`. Zero for a node the session has already visited.
    #[must_use]
    pub fn delta(
        &self,
        definition: &ChamberNarrative,
        prior_state: &NarrativeState,
        target_node_id: &NodeId,
    ) -> u32 {
        if prior_state.has_visited(target_node_id) {
            return 0;
        }

        let mut delta = self.config.base_points;
        match definition.node(target_node_id) {
            Some(NarrativeNode::Insight { .. }) => delta += self.config.insight_bonus,
            Some(NarrativeNode::Completion { .. }) => {
                delta += self.completion_bonus(definition, prior_state);
            }
            _ => {}
        }
        delta
    }

    /// Bonus proportional to graph coverage including the completion node
    /// itself. Integer arithmetic keeps the floor exact.
    fn completion_bonus(&self, definition: &ChamberNarrative, prior_state: &NarrativeState) -> u32 {
        let covered = prior_state.visited_nodes.len() + 1;
        let total = definition.node_count().max(1);
        let scaled = covered as u64 * u64::from(self.config.completion_bonus_max) / total as u64;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}
