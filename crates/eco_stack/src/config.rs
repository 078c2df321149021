//! Configuration management for the stack manager.
//!
//! The whole configuration lives in one TOML file with a table per tracker
//! and one for logging. Every key has a default, so a partial file is valid.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use stack_tracker::{ItemTrackerSettings, OrbTrackerSettings};
use std::path::Path;
use tracing::info;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Largest stack size a host can represent.
const MAX_STACK_SIZE: i32 = 65_535;

fn default_level() -> String {
    "info".to_string()
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcoStackConfig {
    /// Item drop merging and population caps
    #[serde(default)]
    pub item_entity: ItemTrackerSettings,
    /// Experience orb merging
    #[serde(default)]
    pub experience_orb: OrbTrackerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
    /// Optional file path for log output (None means stdout only)
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl EcoStackConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| io_error(path, source))?;
            Self::from_toml_str(&content)
        } else {
            let default_config = Self::default();
            default_config.save_to_file(path).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|source| io_error(path, source))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {VALID_LEVELS:?}",
                self.logging.level
            )));
        }

        let stack_size = self.item_entity.max_stack_size;
        if !(0..=MAX_STACK_SIZE).contains(&stack_size) {
            return Err(ConfigError::Invalid(format!(
                "item_entity.max_stack_size must be between 0 and {MAX_STACK_SIZE}, got {stack_size}"
            )));
        }

        if self
            .item_entity
            .excluded_prefixes
            .iter()
            .any(|prefix| prefix.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "item_entity.excluded_prefixes cannot contain blank entries".to_string(),
            ));
        }

        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}
