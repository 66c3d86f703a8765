//! Backend error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the Taskcluster backend.
#[derive(Debug, Error)]
pub enum TaskclusterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("not authorized to read secret ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("secrets service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unknown host: {0}")]
    UnknownHost(String),

    #[error("invalid secret contents: {0}")]
    InvalidSecret(#[source] serde_json::Error),

    #[error("invalid temporary credential certificate: {0}")]
    InvalidCertificate(#[source] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TaskclusterError {
    /// Returns whether the request that produced this error may succeed if
    /// sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            TaskclusterError::Http(e) => e.is_timeout() || e.is_connect(),
            TaskclusterError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
