//! Declarative narrative graph descriptors.
//!
//! The authored input format: loosely shaped per-node records with a type
//! tag and optional fields. [`NarrativeDescriptor::into_narrative`] turns
//! one into a validated [`ChamberNarrative`], collecting every defect
//! before failing so authors see the full list.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;

use chambers_core::error::{DefinitionDefect, DefinitionDefects, NarrativeError};
use chambers_core::ids::{ChamberId, CharacterArchetype, ChoiceId, NodeId};

use crate::graph::{ChamberNarrative, NarrativeChoice, NarrativeNode};

/// The node type tag carried by every node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Character speech, advances automatically.
    Dialogue,
    /// A branch point.
    Choice,
    /// A reflective beat, advances automatically.
    Insight,
    /// A terminal node.
    Completion,
}

/// One branch option as authored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceDescriptor {
    /// Choice identifier, unique within its node.
    pub id: ChoiceId,
    /// The label presented to the user.
    pub label: String,
    /// The node this choice leads to.
    pub target_node_id: NodeId,
    /// Variables applied to session state on selection.
    #[serde(default)]
    pub variables_patch: BTreeMap<String, serde_json::Value>,
}

/// One node as authored: a type tag plus whichever fields the author
/// filled in. Validation decides whether the combination is coherent.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescriptor {
    /// The node type tag.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// The node content.
    pub content: String,
    /// Branch options; meaningful only on choice nodes.
    #[serde(default)]
    pub choices: Vec<ChoiceDescriptor>,
    /// Automatic advance target; meaningful on dialogue and insight nodes.
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
}

/// A complete narrative graph descriptor for one (chamber, archetype)
/// pair.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeDescriptor {
    /// The chamber the narrative is embedded in.
    pub chamber_id: ChamberId,
    /// The character whose voice drives the dialogue.
    pub character_archetype: CharacterArchetype,
    /// Where a fresh session starts.
    pub start_node_id: NodeId,
    /// The declared terminal nodes.
    #[serde(default)]
    pub completion_node_ids: BTreeSet<NodeId>,
    /// All nodes, keyed by id.
    pub nodes: BTreeMap<NodeId, NodeDescriptor>,
}

impl NarrativeDescriptor {
    /// Validates every content-integrity invariant and converts the
    /// descriptor into an immutable [`ChamberNarrative`].
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::DefinitionInvalid` carrying every defect
    /// found: unresolved start node, dangling next/choice targets, unknown
    /// or non-completion completion ids, empty or duplicated choice sets,
    /// and dead-end nodes.
    pub fn into_narrative(self) -> Result<ChamberNarrative, NarrativeError> {
        let mut defects = Vec::new();

        if !self.nodes.contains_key(&self.start_node_id) {
            defects.push(DefinitionDefect::UnknownStartNode(
                self.start_node_id.clone(),
            ));
        }

        for completion_id in &self.completion_node_ids {
            match self.nodes.get(completion_id) {
                None => defects.push(DefinitionDefect::UnknownCompletionId(completion_id.clone())),
                Some(node) if node.node_type != NodeType::Completion => {
                    defects.push(DefinitionDefect::NotACompletionNode(completion_id.clone()));
                }
                Some(_) => {}
            }
        }

        let mut nodes = BTreeMap::new();
        for (node_id, node) in &self.nodes {
            if let Some(validated) = self.check_node(node_id, node, &mut defects) {
                nodes.insert(node_id.clone(), validated);
            }
        }

        if defects.is_empty() {
            Ok(ChamberNarrative {
                chamber_id: self.chamber_id,
                character_archetype: self.character_archetype,
                nodes,
                start_node_id: self.start_node_id,
                completion_node_ids: self.completion_node_ids,
            })
        } else {
            Err(NarrativeError::DefinitionInvalid(DefinitionDefects(
                defects,
            )))
        }
    }

    /// Validates one node record and converts it into its closed variant.
    /// Returns `None` when the record is defective, pushing the defects.
    fn check_node(
        &self,
        node_id: &NodeId,
        node: &NodeDescriptor,
        defects: &mut Vec<DefinitionDefect>,
    ) -> Option<NarrativeNode> {
        match node.node_type {
            NodeType::Completion => Some(NarrativeNode::Completion {
                content: node.content.clone(),
            }),
            NodeType::Dialogue | NodeType::Insight => {
                let Some(next) = &node.next_node_id else {
                    defects.push(DefinitionDefect::DeadEnd(node_id.clone()));
                    return None;
                };
                if !self.nodes.contains_key(next) {
                    defects.push(DefinitionDefect::DanglingNextTarget {
                        node_id: node_id.clone(),
                        target: next.clone(),
                    });
                    return None;
                }
                let content = node.content.clone();
                let next_node_id = next.clone();
                Some(match node.node_type {
                    NodeType::Insight => NarrativeNode::Insight {
                        content,
                        next_node_id,
                    },
                    _ => NarrativeNode::Dialogue {
                        content,
                        next_node_id,
                    },
                })
            }
            NodeType::Choice => {
                if node.choices.is_empty() {
                    defects.push(DefinitionDefect::NoChoices(node_id.clone()));
                    return None;
                }
                let before = defects.len();
                let mut seen = HashSet::new();
                for choice in &node.choices {
                    if !seen.insert(choice.id.clone()) {
                        defects.push(DefinitionDefect::DuplicateChoiceId {
                            node_id: node_id.clone(),
                            choice_id: choice.id.clone(),
                        });
                    }
                    if !self.nodes.contains_key(&choice.target_node_id) {
                        defects.push(DefinitionDefect::DanglingChoiceTarget {
                            node_id: node_id.clone(),
                            choice_id: choice.id.clone(),
                            target: choice.target_node_id.clone(),
                        });
                    }
                }
                if defects.len() > before {
                    return None;
                }
                Some(NarrativeNode::Choice {
                    content: node.content.clone(),
                    choices: node
                        .choices
                        .iter()
                        .map(|c| NarrativeChoice {
                            id: c.id.clone(),
                            label: c.label.clone(),
                            target_node_id: c.target_node_id.clone(),
                            variables_patch: c.variables_patch.clone(),
                        })
                        .collect(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor_from_yaml(source: &str) -> NarrativeDescriptor {
        serde_yaml::from_str(source).unwrap()
    }

    const VALID: &str = r#"
chamber_id: emotional_processing
character_archetype: compassionate_friend
start_node_id: opening
completion_node_ids: [closing]
nodes:
  opening:
    type: dialogue
    content: "I can sense that something is on your mind."
    next_node_id: fork
  fork:
    type: choice
    content: "Where would you like to go with this?"
    choices:
      - id: sit_with_it
        label: "Sit with the feeling"
        target_node_id: reflection
        variables_patch:
          approach: gentle
      - id: name_it
        label: "Name the feeling"
        target_node_id: reflection
  reflection:
    type: insight
    content: "Naming a feeling already loosens its grip."
    next_node_id: closing
  closing:
    type: completion
    content: "You stayed with it. That matters."
"#;

    #[test]
    fn test_valid_descriptor_converts_to_narrative() {
        let narrative = descriptor_from_yaml(VALID).into_narrative().unwrap();

        assert_eq!(narrative.node_count(), 4);
        assert_eq!(narrative.start_node_id, NodeId::new("opening"));
        assert!(
            narrative
                .node(&NodeId::new("closing"))
                .unwrap()
                .is_completion()
        );

        match narrative.node(&NodeId::new("fork")).unwrap() {
            NarrativeNode::Choice { choices, .. } => {
                assert_eq!(choices.len(), 2);
                assert_eq!(
                    choices[0].variables_patch.get("approach"),
                    Some(&serde_json::json!("gentle"))
                );
            }
            other => panic!("expected choice node, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_start_node_is_a_defect() {
        let mut descriptor = descriptor_from_yaml(VALID);
        descriptor.start_node_id = NodeId::new("missing");

        let err = descriptor.into_narrative().unwrap_err();
        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(defects.0.contains(&DefinitionDefect::UnknownStartNode(
                    NodeId::new("missing")
                )));
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_choice_target_is_a_defect() {
        let source = VALID.replace("target_node_id: reflection", "target_node_id: nowhere");
        let err = descriptor_from_yaml(&source).into_narrative().unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(defects.0.iter().any(|d| matches!(
                    d,
                    DefinitionDefect::DanglingChoiceTarget { target, .. }
                        if *target == NodeId::new("nowhere")
                )));
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_dialogue_without_next_is_a_dead_end() {
        let source = VALID.replace("    next_node_id: fork\n", "");
        let err = descriptor_from_yaml(&source).into_narrative().unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(
                    defects
                        .0
                        .contains(&DefinitionDefect::DeadEnd(NodeId::new("opening")))
                );
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_completion_id_naming_a_dialogue_is_a_defect() {
        let source = VALID.replace(
            "completion_node_ids: [closing]",
            "completion_node_ids: [closing, opening]",
        );
        let err = descriptor_from_yaml(&source).into_narrative().unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(
                    defects
                        .0
                        .contains(&DefinitionDefect::NotACompletionNode(NodeId::new("opening")))
                );
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_choice_id_is_a_defect() {
        let source = VALID.replace("id: name_it", "id: sit_with_it");
        let err = descriptor_from_yaml(&source).into_narrative().unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(defects.0.iter().any(|d| matches!(
                    d,
                    DefinitionDefect::DuplicateChoiceId { choice_id, .. }
                        if *choice_id == ChoiceId::new("sit_with_it")
                )));
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_all_defects_are_collected_not_just_the_first() {
        let source = VALID
            .replace("start_node_id: opening", "start_node_id: missing")
            .replace("target_node_id: reflection", "target_node_id: nowhere");
        let err = descriptor_from_yaml(&source).into_narrative().unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(defects.0.len() >= 3);
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }
}
