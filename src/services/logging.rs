//! Structured logging.
//!
//! Installs a `tracing-subscriber` fmt subscriber writing to stderr, either
//! human-readable or as JSON lines. `RUST_LOG` overrides the configured level.
//!
//! Field names used across the crate: `tab_id`, `window_id`, `next`,
//! `generation`, `observation`.

use std::sync::OnceLock;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::types::errors::LogError;
use crate::types::settings::{LogFormat, LoggingSettings};

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Level filter for `settings`, preferring `RUST_LOG` when it is set and valid.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, LogError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|_| LogError::InvalidLevel(settings.level.clone()))
}

/// Install the global subscriber. Only the first call in a process succeeds.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), LogError> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }
    let filter = build_filter(settings)?;

    let installed = match settings.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .try_init(),
    };
    installed.map_err(|e| LogError::SetSubscriber(e.to_string()))?;

    let _ = LOGGING_INITIALIZED.set(());
    tracing::debug!(level = %settings.level, format = ?settings.format, "logging initialized");
    Ok(())
}
