//! NlpResult - output of a single engine pass.

use serde::{Deserialize, Serialize};

use super::entities::Entity;
use super::intent::{Intent, DEFAULT_INTENT};
use super::sentiment::SentimentResult;

/// Complete analysis of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpResult {
    /// Original utterance
    pub text: String,

    /// Candidate intents, descending confidence; never empty when produced by the engine
    pub intents: Vec<Intent>,

    /// Extracted entities grouped by type
    pub entities: Vec<Entity>,

    pub sentiment: SentimentResult,
}

impl NlpResult {
    /// Highest-confidence candidate.
    pub fn top_intent(&self) -> Option<&Intent> {
        self.intents.first()
    }

    /// Name of the top intent, `default` if there is none.
    pub fn top_intent_name(&self) -> &str {
        self.top_intent()
            .map(|i| i.name.as_str())
            .unwrap_or(DEFAULT_INTENT)
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        let (name, confidence) = self
            .top_intent()
            .map(|i| (i.name.as_str(), i.confidence))
            .unwrap_or((DEFAULT_INTENT, 0.0));
        format!(
            "Intent: {} ({:.0}%), Candidates: {}, Entities: {}, Sentiment: {:?} ({:.2})",
            name,
            confidence * 100.0,
            self.intents.len(),
            self.entities.len(),
            self.sentiment.label,
            self.sentiment.score
        )
    }
}

/// Analysis plus the reply chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedMessage {
    pub nlp_result: NlpResult,
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_intent_name_defaults_when_empty() {
        let result = NlpResult {
            text: String::new(),
            intents: vec![],
            entities: vec![],
            sentiment: SentimentResult::neutral(),
        };
        assert_eq!(result.top_intent_name(), "default");
        assert!(result.summary().contains("Intent: default"));
    }

    #[test]
    fn test_summary() {
        let result = NlpResult {
            text: "hi".to_string(),
            intents: vec![Intent::new("greeting", 0.95)],
            entities: vec![],
            sentiment: SentimentResult::neutral(),
        };
        let summary = result.summary();
        assert!(summary.contains("Intent: greeting (95%)"));
        assert!(summary.contains("Entities: 0"));
    }
}
