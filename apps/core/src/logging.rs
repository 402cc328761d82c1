//! Tracing subscriber setup.

use crate::error::AppError;
use crate::settings::LogSettings;
use std::sync::OnceLock;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Calling it again is a no-op.
pub fn init_tracing(settings: &LogSettings) -> Result<(), AppError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let env_filter = env_filter(settings)?;

    let result = if settings.json {
        let layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json();
        Registry::default().with(layer).with(env_filter).try_init()
    } else {
        let layer = fmt::layer().with_target(true);
        Registry::default().with(layer).with(env_filter).try_init()
    };

    // Another subscriber may already be installed by the host; keep it.
    if result.is_ok() {
        info!(level = %settings.level, json = settings.json, "Logging initialized");
    }
    let _ = INITIALIZED.set(());
    Ok(())
}

fn env_filter(settings: &LogSettings) -> Result<EnvFilter, AppError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AppError::Config(format!("invalid log level {:?}: {}", settings.level, e)))
}
