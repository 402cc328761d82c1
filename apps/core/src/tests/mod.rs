//! Test Module
//!
//! Scenario tests for the ConnectAI core, one file per area.
//!
//! ## Test Categories
//! - `nlp_tests`: Intent ordering, entity offsets, sentiment, reply selection
//! - `training_tests`: Corpus CRUD, import/export, mock training
//! - `config_tests`: Configuration persistence, sections, import
//! - `chat_tests`: Sessions, lead capture, handoff, history
//! - `analytics_tests`: Dashboard aggregates and paging
//! - `store_tests`: File-backed persistence across service restarts

pub mod analytics_tests;
pub mod config_tests;
