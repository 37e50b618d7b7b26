//! Error types for loading configuration.

use thiserror::Error;

/// Errors raised while loading [`GlobalParams`](crate::GlobalParams).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[source] serde_json::Error),
}
