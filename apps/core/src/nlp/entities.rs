//! Entity extraction using per-type regex patterns.
//!
//! Patterns are case-insensitive alternations without word boundaries, so
//! "ai" also tags the inside of "explain". Matches from different types are
//! never deduplicated against each other.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

use super::catalog::DEFAULT_ENTITY_TYPES;

/// An entity found in an utterance. `start..end` are byte offsets, so
/// `&text[start..end] == value` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    pub fn new(
        entity_type: impl Into<String>,
        value: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
            start,
            end,
        }
    }

    /// The span as character offsets into `text`, the form the admin UI
    /// indexes strings by. Equals `start..end` for ASCII input.
    pub fn char_range(&self, text: &str) -> Range<usize> {
        let chars_before = |byte: usize| text.get(..byte).map_or(0, |s| s.chars().count());
        chars_before(self.start)..chars_before(self.end)
    }
}

// NOTE: expect() is acceptable here: the patterns are fixed literals.
static ENTITY_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "attribute",
            Regex::new(r"(?i)features|capabilities|pricing|performance")
                .expect("Invalid regex: attribute pattern"),
        ),
        (
            "platform",
            Regex::new(r"(?i)website|app|mobile|android|ios|web")
                .expect("Invalid regex: platform pattern"),
        ),
        (
            "task",
            Regex::new(r"(?i)setting up|setup|configure|install|implement|integrate")
                .expect("Invalid regex: task pattern"),
        ),
        (
            "product",
            Regex::new(r"(?i)chatbot|assistant|ai|connectai")
                .expect("Invalid regex: product pattern"),
        ),
        (
            "person",
            Regex::new(r"(?i)agent|representative|human|person")
                .expect("Invalid regex: person pattern"),
        ),
        (
            "company",
            Regex::new(r"(?i)company|business|enterprise|organization")
                .expect("Invalid regex: company pattern"),
        ),
    ]
});

/// Extracts entities for every catalog type that has a pattern.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<(&'static str, Regex)>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            patterns: ENTITY_PATTERNS.clone(),
        }
    }

    /// Whether `entity_type` has a compiled pattern.
    pub fn has_pattern(&self, entity_type: &str) -> bool {
        self.pattern(entity_type).is_some()
    }

    fn pattern(&self, entity_type: &str) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|(name, _)| *name == entity_type)
            .map(|(_, re)| re)
    }

    /// Extract against the built-in entity types.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        self.extract_with_catalog(text, DEFAULT_ENTITY_TYPES)
    }

    /// Extract walking `catalog` in order: entities are grouped by type in
    /// catalog order, and within a type in left-to-right match order.
    pub fn extract_with_catalog<I, S>(&self, text: &str, catalog: I) -> Vec<Entity>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entities = Vec::new();

        for entity_type in catalog {
            let entity_type = entity_type.as_ref();
            let Some(regex) = self.pattern(entity_type) else {
                continue;
            };

            for m in regex.find_iter(text) {
                entities.push(Entity::new(entity_type, m.as_str(), m.start(), m.end()));
            }
        }

        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_sample_entities() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("I need help setting up the chatbot");

        assert!(entities.contains(&Entity::new("task", "setting up", 12, 22)));
        assert!(entities.contains(&Entity::new("product", "chatbot", 27, 34)));
    }

    #[test]
    fn test_offsets_slice_original_text() {
        let extractor = EntityExtractor::new();
        let text = "Does ConnectAI work on my Website and Android APP for Enterprise?";

        let entities = extractor.extract(text);
        assert!(!entities.is_empty());
        for entity in &entities {
            assert_eq!(&text[entity.start..entity.end], entity.value);
        }
        // original case is preserved in the value
        assert!(entities.iter().any(|e| e.value == "Website"));
    }

    #[test]
    fn test_grouped_by_type_then_position() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("mobile web chatbot for my business");

        let types: Vec<&str> = entities.iter().map(|e| e.entity_type.as_str()).collect();
        assert_eq!(types, vec!["platform", "platform", "product", "company"]);
        assert_eq!(entities[0].value, "mobile");
        assert_eq!(entities[1].value, "web");
    }

    #[test]
    fn test_matches_inside_words() {
        let extractor = EntityExtractor::new();
        // "connectai" is a product, and "ai" inside "explain" is also tagged
        let entities = extractor.extract("explain connectai");

        let products: Vec<&str> = entities
            .iter()
            .filter(|e| e.entity_type == "product")
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(products, vec!["ai", "connectai"]);
    }

    #[test]
    fn test_overlapping_spans_across_types_are_kept() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("KaiOS");

        // platform precedes product in the catalog, whatever the positions
        assert_eq!(
            entities,
            vec![
                Entity::new("platform", "iOS", 2, 5),
                Entity::new("product", "ai", 1, 3),
            ]
        );
    }

    #[test]
    fn test_char_range_counts_characters() {
        let extractor = EntityExtractor::new();
        let text = "héllo chatbot";
        let entities = extractor.extract(text);

        assert_eq!(entities, vec![Entity::new("product", "chatbot", 7, 14)]);
        assert_eq!(entities[0].char_range(text), 6..13);

        let ascii = "my chatbot";
        let entity = &extractor.extract(ascii)[0];
        assert_eq!(entity.char_range(ascii), entity.start..entity.end);
    }

    #[test]
    fn test_unknown_catalog_types_contribute_nothing() {
        let extractor = EntityExtractor::new();

        assert!(!extractor.has_pattern("invoice"));
        let entities = extractor.extract_with_catalog("invoice for the chatbot", ["invoice"]);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_no_entities() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract("xyz123 qwerty").is_empty());
        assert!(extractor.extract("").is_empty());
    }
}
