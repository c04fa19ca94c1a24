//! In-memory registry of validated narrative definitions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use chambers_core::error::{DefinitionDefect, DefinitionDefects, NarrativeError};
use chambers_core::ids::{ChamberId, CharacterArchetype};

use crate::descriptor::NarrativeDescriptor;
use crate::graph::ChamberNarrative;

/// The narrow lookup capability the session layer depends on, rather than
/// a global registry.
pub trait NarrativeDirectory: Send + Sync {
    /// Retrieves a previously loaded, validated definition.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::NotFound` when no definition is registered
    /// for the pair.
    fn get(
        &self,
        chamber_id: &ChamberId,
        archetype: &CharacterArchetype,
    ) -> Result<Arc<ChamberNarrative>, NarrativeError>;

    /// True if the character narratively supports the chamber, i.e. a
    /// validated definition exists for the pair.
    fn supports(&self, chamber_id: &ChamberId, archetype: &CharacterArchetype) -> bool;
}

/// Loads, validates, and serves narrative definitions.
///
/// Definitions are validated eagerly on load; an invalid definition is
/// never registered. Registered definitions are immutable and shared via
/// `Arc` across all sessions.
#[derive(Debug, Default)]
pub struct DefinitionStore {
    definitions: RwLock<HashMap<(ChamberId, CharacterArchetype), Arc<ChamberNarrative>>>,
}

impl DefinitionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses, validates, and registers a YAML descriptor.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::DefinitionInvalid` for parse errors and
    /// for any content-integrity defect.
    pub fn load_yaml(&self, source: &str) -> Result<Arc<ChamberNarrative>, NarrativeError> {
        let descriptor: NarrativeDescriptor = serde_yaml::from_str(source).map_err(|e| {
            NarrativeError::DefinitionInvalid(DefinitionDefects(vec![DefinitionDefect::Malformed(
                e.to_string(),
            )]))
        })?;
        self.register(descriptor)
    }

    /// Parses, validates, and registers a JSON descriptor.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::DefinitionInvalid` for parse errors and
    /// for any content-integrity defect.
    pub fn load_json(&self, source: &str) -> Result<Arc<ChamberNarrative>, NarrativeError> {
        let descriptor: NarrativeDescriptor = serde_json::from_str(source).map_err(|e| {
            NarrativeError::DefinitionInvalid(DefinitionDefects(vec![DefinitionDefect::Malformed(
                e.to_string(),
            )]))
        })?;
        self.register(descriptor)
    }

    /// Validates and registers an already-parsed descriptor.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::DefinitionInvalid` for any
    /// content-integrity defect.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn register(
        &self,
        descriptor: NarrativeDescriptor,
    ) -> Result<Arc<ChamberNarrative>, NarrativeError> {
        let narrative = Arc::new(descriptor.into_narrative()?);
        let key = (
            narrative.chamber_id.clone(),
            narrative.character_archetype.clone(),
        );

        info!(
            chamber = %key.0,
            archetype = %key.1,
            node_count = narrative.node_count(),
            "registered chamber narrative"
        );

        self.definitions
            .write()
            .unwrap()
            .insert(key, Arc::clone(&narrative));
        Ok(narrative)
    }
}

impl NarrativeDirectory for DefinitionStore {
    fn get(
        &self,
        chamber_id: &ChamberId,
        archetype: &CharacterArchetype,
    ) -> Result<Arc<ChamberNarrative>, NarrativeError> {
        self.definitions
            .read()
            .unwrap()
            .get(&(chamber_id.clone(), archetype.clone()))
            .cloned()
            .ok_or_else(|| {
                NarrativeError::NotFound(format!(
                    "no narrative registered for chamber '{chamber_id}' with character '{archetype}'"
                ))
            })
    }

    fn supports(&self, chamber_id: &ChamberId, archetype: &CharacterArchetype) -> bool {
        self.definitions
            .read()
            .unwrap()
            .contains_key(&(chamber_id.clone(), archetype.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_YAML: &str = r#"
chamber_id: growth_edge
character_archetype: resilient_explorer
start_node_id: spark
completion_node_ids: [summit]
nodes:
  spark:
    type: dialogue
    content: "This challenge is actually an opportunity."
    next_node_id: summit
  summit:
    type: completion
    content: "You're stronger than you realized."
"#;

    const VALID_JSON: &str = r#"{
  "chamber_id": "pattern_recognition",
  "character_archetype": "wise_detective",
  "start_node_id": "clue",
  "completion_node_ids": ["solved"],
  "nodes": {
    "clue": {
      "type": "insight",
      "content": "I'm noticing a pattern here.",
      "next_node_id": "solved"
    },
    "solved": {
      "type": "completion",
      "content": "The dots connect."
    }
  }
}"#;

    #[test]
    fn test_load_yaml_registers_definition() {
        let store = DefinitionStore::new();
        store.load_yaml(VALID_YAML).unwrap();

        let chamber = ChamberId::new("growth_edge");
        let archetype = CharacterArchetype::new("resilient_explorer");
        assert!(store.supports(&chamber, &archetype));

        let narrative = store.get(&chamber, &archetype).unwrap();
        assert_eq!(narrative.node_count(), 2);
    }

    #[test]
    fn test_load_json_registers_definition() {
        let store = DefinitionStore::new();
        store.load_json(VALID_JSON).unwrap();

        let narrative = store
            .get(
                &ChamberId::new("pattern_recognition"),
                &CharacterArchetype::new("wise_detective"),
            )
            .unwrap();
        assert_eq!(narrative.node_count(), 2);
    }

    #[test]
    fn test_invalid_definition_is_never_registered() {
        let store = DefinitionStore::new();
        let broken = VALID_YAML.replace("next_node_id: summit", "next_node_id: nowhere");

        let err = store.load_yaml(&broken).unwrap_err();
        assert!(matches!(err, NarrativeError::DefinitionInvalid(_)));

        assert!(!store.supports(
            &ChamberId::new("growth_edge"),
            &CharacterArchetype::new("resilient_explorer"),
        ));
    }

    #[test]
    fn test_unparseable_yaml_is_definition_invalid() {
        let store = DefinitionStore::new();
        let err = store.load_yaml(": not yaml [").unwrap_err();

        match err {
            NarrativeError::DefinitionInvalid(defects) => {
                assert!(matches!(defects.0[0], DefinitionDefect::Malformed(_)));
            }
            other => panic!("expected DefinitionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_get_unknown_pair_is_not_found() {
        let store = DefinitionStore::new();
        let err = store
            .get(
                &ChamberId::new("comfort_zone"),
                &CharacterArchetype::new("compassionate_friend"),
            )
            .unwrap_err();

        assert!(matches!(err, NarrativeError::NotFound(_)));
    }
}
