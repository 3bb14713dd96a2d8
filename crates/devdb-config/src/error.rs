//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// API URL could not be used as a base for resource paths.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidApiUrl {
        /// Value supplied by the caller or read from disk.
        value: String,
        /// Human-readable reason for the rejection.
        reason: String,
    },
    /// The config file exists but is not a YAML document of the expected shape.
    #[error("config file {} is malformed: {source}", path.display())]
    Malformed {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// The config file parsed but its top level is not a mapping.
    #[error("config file {} must contain a YAML mapping", path.display())]
    NotAMapping {
        /// Config file path.
        path: PathBuf,
    },
    /// Encoding the config document failed.
    #[error("failed to encode config file {}: {source}", path.display())]
    Encode {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// File system operation failed.
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
