//! Model catalog: the intent and entity-type names the engine iterates,
//! plus the descriptive metadata shown in the admin dashboard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::training::TrainingExample;

/// Built-in intents, in evaluation order.
pub const DEFAULT_INTENTS: [&str; 7] = [
    "product_info",
    "pricing",
    "implementation",
    "support",
    "greeting",
    "goodbye",
    "lead_generation",
];

/// Built-in entity types, in extraction order.
pub const DEFAULT_ENTITY_TYPES: [&str; 6] = [
    "attribute",
    "platform",
    "task",
    "product",
    "person",
    "company",
];

/// Accuracy reported for the seeded model.
pub const INITIAL_ACCURACY: f32 = 0.87;

/// Ceiling for the mock training accuracy bump.
pub const MAX_ACCURACY: f32 = 0.95;

/// The NLP model as seen by the admin UI.
///
/// `intents` and `entity_types` double as the engine's catalog: the
/// classifier and extractor walk them in order. Names are only ever
/// appended, and a name with no built-in rule simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub last_trained: DateTime<Utc>,
    pub accuracy: f32,
    pub examples: Vec<TrainingExample>,
    pub intents: Vec<String>,
    pub entity_types: Vec<String>,
}

impl Default for NlpModel {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            name: "ConnectAI Core NLP".to_string(),
            description: "Core model for intent detection and entity extraction".to_string(),
            last_trained: Utc::now() - Duration::days(1),
            accuracy: INITIAL_ACCURACY,
            examples: super::training::sample_examples(),
            intents: DEFAULT_INTENTS.iter().map(|s| s.to_string()).collect(),
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NlpModel {
    /// Appends names not yet in the catalog, preserving existing order.
    /// Returns how many names were added.
    pub fn extend_catalog<'a, I, E>(&mut self, intents: I, entity_types: E) -> usize
    where
        I: IntoIterator<Item = &'a String>,
        E: IntoIterator<Item = &'a String>,
    {
        append_missing(&mut self.intents, intents)
            + append_missing(&mut self.entity_types, entity_types)
    }
}

pub(crate) fn append_missing<'a, I>(target: &mut Vec<String>, names: I) -> usize
where
    I: IntoIterator<Item = &'a String>,
{
    let mut added = 0;
    for name in names {
        if !target.contains(name) {
            target.push(name.clone());
            added += 1;
        }
    }
    added
}
