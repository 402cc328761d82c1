//! NLP Engine - orchestrates classification, extraction, sentiment and
//! response selection over a shared model catalog.

use rand::Rng;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

use super::catalog::NlpModel;
use super::entities::EntityExtractor;
use super::intent::IntentClassifier;
use super::responses::ResponseSelector;
use super::result::{NlpResult, ProcessedMessage};
use super::sentiment::SentimentScorer;
use super::training::TrainingData;

/// The text understanding engine.
///
/// Built once per process and shared by reference (or `Arc`). Analysis only
/// reads the catalog; training appends to it under a write lock.
pub struct NlpEngine {
    model: RwLock<NlpModel>,
    intent_classifier: IntentClassifier,
    entity_extractor: EntityExtractor,
    sentiment_scorer: SentimentScorer,
    response_selector: ResponseSelector,
}

impl Default for NlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NlpEngine {
    /// Create an engine over the seeded product model.
    pub fn new() -> Self {
        Self::with_model(NlpModel::default())
    }

    pub fn with_model(model: NlpModel) -> Self {
        Self {
            model: RwLock::new(model),
            intent_classifier: IntentClassifier::new(),
            entity_extractor: EntityExtractor::new(),
            sentiment_scorer: SentimentScorer::new(),
            response_selector: ResponseSelector::new(),
        }
    }

    /// Snapshot of the current model.
    pub fn model(&self) -> NlpModel {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Analyze an utterance. Total: any input yields a result.
    pub fn analyze(&self, text: &str) -> NlpResult {
        let model = self.model.read().unwrap_or_else(PoisonError::into_inner);

        let result = NlpResult {
            text: text.to_string(),
            intents: self
                .intent_classifier
                .classify_with_catalog(text, &model.intents),
            entities: self
                .entity_extractor
                .extract_with_catalog(text, &model.entity_types),
            sentiment: self.sentiment_scorer.score(text),
        };

        debug!("{}", result.summary());
        result
    }

    /// Reply for the top intent, using the thread-local RNG.
    pub fn respond(&self, result: &NlpResult) -> String {
        self.respond_with(result, &mut rand::thread_rng())
    }

    /// Reply for the top intent, using the supplied RNG.
    pub fn respond_with<R: Rng + ?Sized>(&self, result: &NlpResult, rng: &mut R) -> String {
        self.response_selector.select(result.top_intent_name(), rng)
    }

    /// Candidate replies the selector may return for `result`.
    pub fn candidate_responses(&self, result: &NlpResult) -> &'static [&'static str] {
        self.response_selector.candidates(result.top_intent_name())
    }

    /// Analyze then respond.
    pub fn process_and_respond(&self, text: &str) -> ProcessedMessage {
        self.process_and_respond_with(text, &mut rand::thread_rng())
    }

    pub fn process_and_respond_with<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> ProcessedMessage {
        let nlp_result = self.analyze(text);
        let response = self.respond_with(&nlp_result, rng);
        ProcessedMessage {
            nlp_result,
            response,
        }
    }

    /// Folds a training corpus into the model: metadata is refreshed and
    /// new catalog names are appended. No matching rules are created.
    pub fn apply_training(&self, data: &TrainingData, accuracy: f32) -> NlpModel {
        let mut model = self.model.write().unwrap_or_else(PoisonError::into_inner);

        let added = model.extend_catalog(&data.intents, &data.entity_types);
        model.examples = data.examples.clone();
        model.accuracy = accuracy;
        model.last_trained = chrono::Utc::now();

        info!(
            examples = model.examples.len(),
            new_catalog_names = added,
            accuracy = model.accuracy,
            "Model catalog updated from training data"
        );
        model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::intent::Intent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_basic_analysis() {
        let engine = NlpEngine::new();

        let result = engine.analyze("Hello, how much does the chatbot cost?");

        assert_eq!(result.text, "Hello, how much does the chatbot cost?");
        assert_eq!(result.intents[0], Intent::new("greeting", 0.95));
        assert!(result.intents.iter().any(|i| i.name == "pricing"));
        assert!(result.entities.iter().any(|e| e.value == "chatbot"));
    }

    #[test]
    fn test_process_and_respond_uses_top_intent() {
        let engine = NlpEngine::new();
        let mut rng = StdRng::seed_from_u64(3);

        let processed = engine.process_and_respond_with("What are your pricing plans?", &mut rng);
        assert_eq!(processed.nlp_result.top_intent_name(), "pricing");
        assert!(engine
            .candidate_responses(&processed.nlp_result)
            .contains(&processed.response.as_str()));
    }

    #[test]
    fn test_training_extends_catalog_without_rules() {
        let engine = NlpEngine::new();
        let mut data = TrainingData::default();
        data.intents.push("refund_request".to_string());
        data.entity_types.push("invoice".to_string());

        let model = engine.apply_training(&data, 0.9);

        assert!(model.intents.contains(&"refund_request".to_string()));
        assert!(model.entity_types.contains(&"invoice".to_string()));
        assert_eq!(engine.model().accuracy, 0.9);

        let result = engine.analyze("refund my invoice");
        assert_eq!(result.intents, vec![Intent::fallback()]);
        assert!(result.entities.is_empty());
    }

    #[test]
    fn test_training_never_removes_catalog_names() {
        let engine = NlpEngine::new();
        let data = TrainingData {
            intents: vec![],
            entity_types: vec![],
            ..TrainingData::default()
        };

        let model = engine.apply_training(&data, 0.88);
        assert_eq!(model.intents.len(), 7);
        assert_eq!(engine.analyze("hi").intents[0].name, "greeting");
    }
}
