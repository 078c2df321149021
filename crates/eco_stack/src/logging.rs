//! Logging system setup.
//!
//! Installs a tracing-subscriber registry with an `EnvFilter` and either a
//! JSON or a human-readable fmt layer.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes logging from the config file settings.
///
/// `json_format` forces JSON output regardless of the file. `RUST_LOG`, when
/// set, overrides the configured level.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    try_setup_logging(config, json_format)?;
    Ok(())
}

/// Like [`setup_logging`], but keeps the typed error. Fails when a global
/// subscriber is already installed.
pub fn try_setup_logging(config: &LoggingSettings, json_format: bool) -> Result<(), TryInitError> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("Logging initialized with level: {}", log_level);
    Ok(())
}
