//! Shared Module
//!
//! Platform-agnostic types: the article wire model, the queued intent
//! model, configuration and the shared error type. Nothing in here touches
//! the network or the local store.

/// Article wire model
pub mod article;

/// Queued user intents
pub mod action;

/// Shared error types
pub mod error;

/// Installation configuration
pub mod config;

pub use action::{ArticleAction, Intent, PendingAction, NEW_ARTICLE_SENTINEL};
pub use article::{ArchivedPage, Article, ArticleStatus};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
