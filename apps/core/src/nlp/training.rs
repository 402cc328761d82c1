//! Training corpus management for the admin dashboard.
//!
//! The corpus is bookkeeping only: examples never change how the engine
//! matches. Every mutation builds the next corpus on a copy, persists it,
//! and only then swaps it in, so a failed write leaves memory untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::catalog::{append_missing, NlpModel, DEFAULT_ENTITY_TYPES, DEFAULT_INTENTS, MAX_ACCURACY};
use super::engine::NlpEngine;
use super::entities::Entity;
use crate::error::AppError;
use crate::store::{load_json_or_warn, save_json, KeyValueStore};

/// Storage key of the persisted corpus.
pub const TRAINING_STORAGE_KEY: &str = "connectai_training_data";

/// Upper bound of the accuracy bump applied by a mock training run.
const MAX_ACCURACY_GAIN: f32 = 0.05;

/// An annotated utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub id: String,
    pub text: String,
    pub intent: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// A training example as submitted by the admin UI, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TrainingExampleInput {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub intent: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl TrainingExampleInput {
    pub fn new(text: impl Into<String>, intent: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            text: text.into(),
            intent: intent.into(),
            entities,
        }
    }

    fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        for entity in &self.entities {
            if entity.entity_type.is_empty() {
                return Err(AppError::Validation("entity type must not be empty".to_string()));
            }
            if entity.start > entity.end || entity.end > self.text.len() {
                return Err(AppError::Validation(format!(
                    "entity span {}..{} is outside the example text",
                    entity.start, entity.end
                )));
            }
        }
        Ok(())
    }

    fn into_example(self, id: String) -> TrainingExample {
        TrainingExample {
            id,
            text: self.text,
            intent: self.intent,
            entities: self.entities,
        }
    }
}

/// The import/export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingData {
    pub examples: Vec<TrainingExample>,
    pub intents: Vec<String>,
    pub entity_types: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl Default for TrainingData {
    fn default() -> Self {
        Self {
            examples: sample_examples(),
            intents: DEFAULT_INTENTS.iter().map(|s| s.to_string()).collect(),
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect(),
            last_updated: Utc::now(),
        }
    }
}

impl TrainingData {
    fn register_names(&mut self, example: &TrainingExample) {
        append_missing(&mut self.intents, [&example.intent]);
        append_missing(
            &mut self.entity_types,
            example.entities.iter().map(|e| &e.entity_type),
        );
    }
}

/// Shape accepted by import: `examples` is required, catalogs that are
/// missing or `null` become empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    examples: Vec<TrainingExample>,
    #[serde(default)]
    intents: Option<Vec<String>>,
    #[serde(default)]
    entity_types: Option<Vec<String>>,
}

/// Seed corpus of the product model.
pub fn sample_examples() -> Vec<TrainingExample> {
    let example = |id: &str, text: &str, intent: &str, entities: Vec<Entity>| TrainingExample {
        id: id.to_string(),
        text: text.to_string(),
        intent: intent.to_string(),
        entities,
    };

    vec![
        example(
            "1",
            "I want to know more about your product features",
            "product_info",
            vec![Entity::new("attribute", "features", 39, 47)],
        ),
        example("2", "What are your pricing plans?", "pricing", vec![]),
        example(
            "3",
            "How do I implement ConnectAI on my website?",
            "implementation",
            vec![Entity::new("platform", "website", 35, 42)],
        ),
        example(
            "4",
            "I need help setting up the chatbot",
            "support",
            vec![
                Entity::new("task", "setting up", 12, 22),
                Entity::new("product", "chatbot", 27, 34),
            ],
        ),
        example(
            "5",
            "Can you tell me about your AI capabilities?",
            "product_info",
            vec![Entity::new("attribute", "AI capabilities", 27, 42)],
        ),
    ]
}

/// CRUD, import/export and mock training over the persisted corpus.
pub struct TrainingService {
    store: Arc<dyn KeyValueStore>,
    data: TrainingData,
}

impl TrainingService {
    /// Loads the stored corpus, or the seed corpus if none (or an unreadable one) is stored.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let data = load_json_or_warn::<TrainingData>(store.as_ref(), TRAINING_STORAGE_KEY)
            .unwrap_or_default();
        Self { store, data }
    }

    /// Snapshot of the corpus.
    pub fn training_data(&self) -> TrainingData {
        self.data.clone()
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.data.examples
    }

    pub fn example(&self, id: &str) -> Option<&TrainingExample> {
        self.data.examples.iter().find(|e| e.id == id)
    }

    fn commit(&mut self, mut next: TrainingData) -> Result<(), AppError> {
        next.last_updated = Utc::now();
        save_json(self.store.as_ref(), TRAINING_STORAGE_KEY, &next)?;
        self.data = next;
        Ok(())
    }

    /// Adds an example with a fresh id; unseen intent and entity type names join the catalogs.
    #[instrument(skip(self, input), fields(intent = %input.intent))]
    pub fn add_example(
        &mut self,
        input: TrainingExampleInput,
    ) -> Result<TrainingExample, AppError> {
        input.check()?;
        let example = input.into_example(Uuid::new_v4().to_string());

        let mut next = self.data.clone();
        next.register_names(&example);
        next.examples.push(example.clone());
        self.commit(next)?;

        info!(id = %example.id, "Training example added");
        Ok(example)
    }

    /// Replaces the example with `id` in place.
    #[instrument(skip(self, input))]
    pub fn update_example(
        &mut self,
        id: &str,
        input: TrainingExampleInput,
    ) -> Result<TrainingExample, AppError> {
        input.check()?;
        let index = self
            .data
            .examples
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound(format!("training example {}", id)))?;
        let example = input.into_example(id.to_string());

        let mut next = self.data.clone();
        next.register_names(&example);
        next.examples[index] = example.clone();
        self.commit(next)?;

        info!("Training example updated");
        Ok(example)
    }

    /// Removes the example with `id`. Returns whether anything was removed.
    #[instrument(skip(self))]
    pub fn delete_example(&mut self, id: &str) -> Result<bool, AppError> {
        if self.example(id).is_none() {
            return Ok(false);
        }

        let mut next = self.data.clone();
        next.examples.retain(|e| e.id != id);
        self.commit(next)?;

        info!("Training example deleted");
        Ok(true)
    }

    /// Pretty-printed JSON document of the whole corpus.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replaces the corpus with an imported document, returning the new corpus.
    /// On any failure the current corpus is kept.
    pub fn try_import_json(&mut self, json: &str) -> Result<&TrainingData, AppError> {
        let document: ImportDocument = serde_json::from_str(json)?;
        let next = TrainingData {
            examples: document.examples,
            intents: document.intents.unwrap_or_default(),
            entity_types: document.entity_types.unwrap_or_default(),
            last_updated: Utc::now(),
        };
        self.commit(next)?;
        info!(examples = self.data.examples.len(), "Training data imported");
        Ok(&self.data)
    }

    /// Import reporting only success; failures are logged.
    pub fn import_json(&mut self, json: &str) -> bool {
        match self.try_import_json(json) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Error importing training data");
                false
            }
        }
    }

    /// Mock training run using the thread-local RNG.
    pub fn train_model(&self, engine: &NlpEngine) -> NlpModel {
        self.train_model_with(engine, &mut rand::thread_rng())
    }

    /// Mock training run: bumps accuracy by a random amount below 0.05,
    /// capped at 0.95, and folds the corpus catalogs into the engine.
    pub fn train_model_with<R: Rng + ?Sized>(&self, engine: &NlpEngine, rng: &mut R) -> NlpModel {
        let gain = rng.gen_range(0.0..MAX_ACCURACY_GAIN);
        let accuracy = (engine.model().accuracy + gain).min(MAX_ACCURACY);
        engine.apply_training(&self.data, accuracy)
    }
}
