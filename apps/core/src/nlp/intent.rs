//! Intent classification using keyword rules.
//!
//! Each built-in intent owns a rule: a set of lower-case substrings and a
//! fixed confidence. A rule fires when any of its substrings occurs in the
//! lower-cased utterance; the confidence never depends on how many matched.

use serde::{Deserialize, Serialize};

use super::catalog::DEFAULT_INTENTS;

/// Fallback intent name when no rule fires.
pub const DEFAULT_INTENT: &str = "default";

/// Confidence assigned to the fallback intent.
pub const DEFAULT_CONFIDENCE: f32 = 0.3;

/// A scored intent candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

impl Intent {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    /// The `{default, 0.3}` fallback candidate.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_INTENT, DEFAULT_CONFIDENCE)
    }

    pub fn is_fallback(&self) -> bool {
        self.name == DEFAULT_INTENT
    }
}

/// Keyword rule for one intent.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub confidence: f32,
}

impl IntentRule {
    fn fires(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|k| lower_text.contains(k))
    }
}

const RULES: [IntentRule; 7] = [
    IntentRule {
        name: "product_info",
        keywords: &[
            "product",
            "feature",
            "capability",
            "tell me about",
            "what is",
            "how does",
        ],
        confidence: 0.8,
    },
    IntentRule {
        name: "pricing",
        keywords: &["price", "cost", "subscription", "plan", "payment", "how much"],
        confidence: 0.9,
    },
    IntentRule {
        name: "implementation",
        keywords: &["implement", "setup", "install", "integrate", "add to", "website"],
        confidence: 0.85,
    },
    IntentRule {
        name: "support",
        keywords: &["help", "support", "issue", "problem", "trouble", "doesn't work"],
        confidence: 0.75,
    },
    IntentRule {
        name: "greeting",
        keywords: &["hi", "hello", "hey"],
        confidence: 0.95,
    },
    IntentRule {
        name: "goodbye",
        keywords: &["bye", "goodbye", "thank", "thanks"],
        confidence: 0.9,
    },
    IntentRule {
        name: "lead_generation",
        keywords: &[
            "talk to",
            "contact",
            "sales",
            "demo",
            "trial",
            "representative",
        ],
        confidence: 0.85,
    },
];

/// Rule-based intent classifier.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: RULES.to_vec(),
        }
    }

    /// Looks up the rule for an intent name.
    pub fn rule(&self, name: &str) -> Option<&IntentRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Classify against the built-in catalog.
    pub fn classify(&self, text: &str) -> Vec<Intent> {
        self.classify_with_catalog(text, DEFAULT_INTENTS)
    }

    /// Classify walking `catalog` in order. Names without a rule are skipped.
    ///
    /// The result is sorted by descending confidence with ties kept in
    /// catalog order, and is never empty.
    pub fn classify_with_catalog<I, S>(&self, text: &str, catalog: I) -> Vec<Intent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lower_text = text.to_lowercase();

        let mut candidates: Vec<Intent> = catalog
            .into_iter()
            .filter_map(|name| {
                self.rule(name.as_ref())
                    .filter(|rule| rule.fires(&lower_text))
                    .map(|rule| Intent::new(rule.name, rule.confidence))
            })
            .collect();

        if candidates.is_empty() {
            return vec![Intent::fallback()];
        }

        // sort_by is stable, so equal confidences keep catalog order
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }
}
