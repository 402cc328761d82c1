//! Lexicon-based sentiment scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "good",
    "excellent",
    "amazing",
    "love",
    "like",
    "helpful",
    "thanks",
];

// "not working" can never equal a single token; kept to mirror the product lexicon.
const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "poor",
    "terrible",
    "hate",
    "dislike",
    "problem",
    "issue",
    "not working",
];

const WORD_WEIGHT: f32 = 0.2;
const LABEL_THRESHOLD: f32 = 0.3;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("Invalid regex: non-word separator"));

/// Coarse polarity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Maps a score onto a label: above 0.3 positive, below -0.3 negative.
    pub fn from_score(score: f32) -> Self {
        if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Score in [-1, 1] and its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f32,
    pub label: SentimentLabel,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();

        let raw: f32 = NON_WORD
            .split(&lower)
            .map(|token| {
                let mut delta = 0.0;
                if POSITIVE_WORDS.contains(&token) {
                    delta += WORD_WEIGHT;
                }
                if NEGATIVE_WORDS.contains(&token) {
                    delta -= WORD_WEIGHT;
                }
                delta
            })
            .sum();

        let score = raw.clamp(-1.0, 1.0);
        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.score("What are your pricing plans?"), SentimentResult::neutral());
        assert_eq!(scorer.score(""), SentimentResult::neutral());
    }

    #[test]
    fn test_single_word_stays_neutral() {
        let scorer = SentimentScorer::new();
        let result = scorer.score("This is good");
        assert!((result.score - 0.2).abs() < 1e-6);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_positive_and_negative_labels() {
        let scorer = SentimentScorer::new();

        let positive = scorer.score("Great product, really helpful. Thanks!");
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert!((positive.score - 0.6).abs() < 1e-6);

        let negative = scorer.score("Terrible support, I hate this problem");
        assert_eq!(negative.label, SentimentLabel::Negative);
        assert!((negative.score + 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_symmetry_under_lexicon_swap() {
        let scorer = SentimentScorer::new();
        let positive = scorer.score("good great love excellent");
        let negative = scorer.score("bad poor hate terrible");

        assert_eq!(positive.score, -negative.score);
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert_eq!(negative.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = SentimentScorer::new();
        let text = "good ".repeat(20);
        let result = scorer.score(&text);
        assert_eq!(result.score, 1.0);

        let text = "bad ".repeat(20);
        assert_eq!(scorer.score(&text).score, -1.0);
    }

    #[test]
    fn test_multi_word_lexicon_entry_never_matches() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.score("it is not working").score, 0.0);
    }
}
