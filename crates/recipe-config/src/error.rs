//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of yaml, yml, toml, json
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The file contents could not be deserialized
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// An environment override holds an unusable value
    #[error("invalid value for {name}: {reason}")]
    InvalidEnv {
        /// Variable name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The merged configuration failed validation
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
