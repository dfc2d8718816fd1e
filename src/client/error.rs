//! Client Error Types
//!
//! Every failure in the engine degrades to "intent not delivered this
//! cycle"; none of these are fatal to the process. They are still returned
//! as values so callers decide whether to retry or surface them.

use crate::shared::{ConfigError, SharedError};
use thiserror::Error;

/// Result alias used across the client module
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Local SQLite read or write failed
    #[error("Local store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The installation has no base URL or token yet
    #[error("Installation not configured: missing {0}")]
    NotConfigured(&'static str),

    /// Base URL plus path did not form a valid URL
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, connect, timeout, body decode)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered outside 200-299
    #[error("Server responded {status} to {method} {path}")]
    Status {
        status: u16,
        method: &'static str,
        path: String,
    },

    /// Share inbox file could not be read or written
    #[error("Inbox I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned sync cycle panicked or was cancelled
    #[error("Sync task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shared(#[from] SharedError),
}

impl ClientError {
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Shared(err.into())
    }
}
