//! ConnectAI Core
//! Rule-based chatbot engine behind the ConnectAI widget and admin dashboard.
//!
//! ## Modules
//! - `nlp`: Intent, entity and sentiment analysis plus canned replies
//! - `config`: Chatbot configuration with persistence
//! - `chat`: Visitor sessions (history, lead capture, handoff)
//! - `analytics`: Dashboard aggregates over recorded conversations
//! - `store`: Key-value persistence (memory or JSON files)
//! - `settings`, `logging`, `fs_manager`: Environment, tracing and paths

pub mod analytics;
pub mod chat;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod logging;
pub mod nlp;
pub mod settings;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::AppError;
pub use nlp::{NlpEngine, NlpResult, ProcessedMessage};
pub use settings::AppSettings;
