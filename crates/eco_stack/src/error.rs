//! Error types for the service layer.

use std::path::PathBuf;

/// Failures while loading, saving or checking the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`crate::EcoStackConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parsed but are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
