//! Runtime settings read from the environment (and an optional `.env` file).

use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DATA_DIR_VAR: &str = "CONNECTAI_DATA_DIR";
const RESPONSE_DELAY_VAR: &str = "CONNECTAI_RESPONSE_DELAY_MS";
const HISTORY_LIMIT_VAR: &str = "CONNECTAI_HISTORY_LIMIT";
const LOG_LEVEL_VAR: &str = "CONNECTAI_LOG_LEVEL";
const LOG_JSON_VAR: &str = "CONNECTAI_LOG_JSON";

/// Artificial latency before a bot reply, matching the widget's UX.
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 1000;

/// Number of chat messages kept in persisted history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Logging configuration consumed by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Chat pacing and history retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub response_delay: Duration,
    pub history_limit: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            response_delay: Duration::from_millis(DEFAULT_RESPONSE_DELAY_MS),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ChatSettings {
    /// No artificial latency; used by tests and batch callers.
    pub fn immediate() -> Self {
        Self {
            response_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Top-level settings for a process embedding the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    /// Directory for file-backed storage; `None` means in-memory only.
    pub data_dir: Option<PathBuf>,
    pub chat: ChatSettings,
    pub log: LogSettings,
}

impl AppSettings {
    /// Loads settings from the process environment after reading `.env`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let data_dir = env::var(DATA_DIR_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let response_delay = parse_var::<u64>(RESPONSE_DELAY_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.chat.response_delay);

        let history_limit =
            parse_var::<usize>(HISTORY_LIMIT_VAR)?.unwrap_or(defaults.chat.history_limit);
        if history_limit == 0 {
            return Err(AppError::Config(format!(
                "{} must be greater than zero",
                HISTORY_LIMIT_VAR
            )));
        }

        let level = env::var(LOG_LEVEL_VAR).unwrap_or(defaults.log.level);
        let json = parse_var::<bool>(LOG_JSON_VAR)?.unwrap_or(defaults.log.json);

        Ok(Self {
            data_dir,
            chat: ChatSettings {
                response_delay,
                history_limit,
            },
            log: LogSettings { level, json },
        })
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
