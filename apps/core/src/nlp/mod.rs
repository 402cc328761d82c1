//! # NLP Module
//!
//! Local, rule-based text understanding for the ConnectAI chatbot.
//! No model inference: every decision is a keyword or regex match.
//!
//! ## Components
//! - `intent`: Keyword rules with fixed confidences per intent
//! - `entities`: Regex entity extraction with byte offsets
//! - `sentiment`: Lexicon word-count polarity
//! - `responses`: Canned replies per intent, random pick
//! - `catalog`: Intent / entity-type catalog and model metadata
//! - `result`: Output data structures
//! - `engine`: Main orchestrator
//! - `training`: Training corpus CRUD and import/export

pub mod catalog;
pub mod engine;
pub mod entities;
pub mod intent;
pub mod responses;
pub mod result;
pub mod sentiment;
pub mod training;

pub use catalog::NlpModel;
pub use engine::NlpEngine;
pub use entities::{Entity, EntityExtractor};
pub use intent::{Intent, IntentClassifier};
pub use responses::ResponseSelector;
pub use result::{NlpResult, ProcessedMessage};
pub use sentiment::{SentimentLabel, SentimentResult, SentimentScorer};
pub use training::{TrainingData, TrainingExample, TrainingExampleInput, TrainingService};
