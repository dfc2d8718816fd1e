//! Shared Error Types
//!
//! Error types for the platform-agnostic data model: decoding server
//! payloads and validating queued intents before they reach the log.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures
//! - `UnknownAction` - An action type string outside the closed action set
//!
//! # Usage
//!
//! ```rust
//! use notebrain_sync::shared::error::SharedError;
//!
//! let error = SharedError::validation("url", "URL cannot be empty");
//! assert!(error.to_string().contains("url"));
//! ```
use thiserror::Error;

/// Shared error types used by the article and action models
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Stored or received action type that is not part of the action set
    #[error("Unknown action type: {action_type}")]
    UnknownAction {
        /// The offending action type string
        action_type: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown-action error
    pub fn unknown_action(action_type: impl Into<String>) -> Self {
        Self::UnknownAction {
            action_type: action_type.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
