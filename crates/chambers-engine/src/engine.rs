//! The narrative transition function.

use chambers_content::graph::{ChamberNarrative, NarrativeNode};
use chambers_core::error::NarrativeError;
use chambers_core::event::{NarrativeAdvanced, NarrativeCompleted, NarrativeEvent};
use chambers_core::ids::ChoiceId;
use chambers_core::state::NarrativeState;

use crate::scoring::{ProgressScorer, ScoringConfig};

/// The result of one successful transition: the new state, the event it
/// emitted, and the score it awarded. The caller persists the state and
/// dispatches the event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state after the transition.
    pub state: NarrativeState,
    /// The emitted event.
    pub event: NarrativeEvent,
    /// Points awarded by this transition.
    pub score_delta: u32,
}

/// Pure, deterministic, side-effect-free transition function over
/// validated narrative graphs. Safe to share and invoke from any number
/// of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeEngine {
    scorer: ProgressScorer,
}

impl NarrativeEngine {
    /// Creates an engine with the given scoring constants.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            scorer: ProgressScorer::new(config),
        }
    }

    /// Advances `state` one step through `definition`, selecting
    /// `choice_id` when the current node is a choice node.
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` when the session is terminal, a choice is
    ///   supplied at a non-choice node, a choice is omitted at a choice
    ///   node, or the current node is a completion node.
    /// - `InvalidChoice` when `choice_id` is not offered by the current
    ///   node.
    /// - `NotFound` when a node id fails to resolve. Unreachable for a
    ///   definition that passed load-time validation, but checked
    ///   defensively.
    pub fn advance(
        &self,
        definition: &ChamberNarrative,
        state: &NarrativeState,
        choice_id: Option<&ChoiceId>,
    ) -> Result<Transition, NarrativeError> {
        if state.terminal {
            return Err(NarrativeError::InvalidOperation(
                "session is terminal and accepts no further transitions".into(),
            ));
        }

        let node = definition.node(&state.current_node_id).ok_or_else(|| {
            NarrativeError::NotFound(format!(
                "node '{}' is not defined in this narrative",
                state.current_node_id
            ))
        })?;

        let mut next = state.clone();
        let target = match node {
            NarrativeNode::Choice { choices, .. } => {
                let choice_id = choice_id.ok_or_else(|| {
                    NarrativeError::InvalidOperation(format!(
                        "node '{}' requires a choice",
                        state.current_node_id
                    ))
                })?;
                let choice = choices
                    .iter()
                    .find(|c| c.id == *choice_id)
                    .ok_or_else(|| NarrativeError::InvalidChoice {
                        node_id: state.current_node_id.clone(),
                        choice_id: choice_id.clone(),
                    })?;
                for (name, value) in &choice.variables_patch {
                    next.variables.insert(name.clone(), value.clone());
                }
                choice.target_node_id.clone()
            }
            NarrativeNode::Dialogue { next_node_id, .. }
            | NarrativeNode::Insight { next_node_id, .. } => {
                if choice_id.is_some() {
                    return Err(NarrativeError::InvalidOperation(format!(
                        "node '{}' does not accept a choice",
                        state.current_node_id
                    )));
                }
                next_node_id.clone()
            }
            NarrativeNode::Completion { .. } => {
                // A non-terminal state resting on a completion node breaks
                // the terminal invariant; refuse rather than guess.
                return Err(NarrativeError::InvalidOperation(format!(
                    "node '{}' is a completion node with no outgoing transition",
                    state.current_node_id
                )));
            }
        };

        next.record_visit(state.current_node_id.clone());

        let score_delta = self.scorer.delta(definition, &next, &target);
        next.progress_score += score_delta;

        let target_node = target.clone();
        let event = match definition.node(&target) {
            None => {
                return Err(NarrativeError::NotFound(format!(
                    "node '{target}' is not defined in this narrative"
                )));
            }
            Some(NarrativeNode::Completion { .. }) => {
                next.record_visit(target.clone());
                next.terminal = true;
                NarrativeEvent::Completed(NarrativeCompleted {
                    completion_node_id: target_node,
                    final_score: next.progress_score,
                })
            }
            Some(_) => NarrativeEvent::Advanced(NarrativeAdvanced {
                from: state.current_node_id.clone(),
                to: target_node,
            }),
        };

        next.current_node_id = target;
        next.version += 1;

        Ok(Transition {
            state: next,
            event,
            score_delta,
        })
    }
}
