//! Queued user intents
//!
//! A [`PendingAction`] is one row of the action log: something the user
//! asked for that the server has not yet confirmed. Rows are never edited;
//! a change of mind is a newer row for the same target.
//!
//! The log table keeps the legacy `(article_id, action_type, url)` shape,
//! where an `add` request carries article id `0` because the article does
//! not exist yet. That sentinel never leaves the storage layer: in memory
//! an add is [`Intent::ForNewUrl`].

use crate::shared::error::SharedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Article id stored for intents that precede article creation
pub const NEW_ARTICLE_SENTINEL: i64 = 0;

/// Action type string stored for add-by-URL intents
pub const ADD_ACTION_TYPE: &str = "add";

/// Actions that target an existing article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleAction {
    Star,
    Unstar,
    Archive,
    Delete,
    Summarize,
}

impl ArticleAction {
    pub const ALL: [ArticleAction; 5] = [
        ArticleAction::Star,
        ArticleAction::Unstar,
        ArticleAction::Archive,
        ArticleAction::Delete,
        ArticleAction::Summarize,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleAction::Star => "star",
            ArticleAction::Unstar => "unstar",
            ArticleAction::Archive => "archive",
            ArticleAction::Delete => "delete",
            ArticleAction::Summarize => "summarize",
        }
    }

    /// Parse a stored action type
    pub fn parse(value: &str) -> Result<Self, SharedError> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| SharedError::unknown_action(value))
    }
}

impl fmt::Display for ArticleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// An action on an article the server already knows about
    ForArticle { article_id: i64, action: ArticleAction },
    /// Save a captured URL as a new article
    ForNewUrl { url: String },
}

impl Intent {
    pub fn star(article_id: i64) -> Self {
        Intent::ForArticle { article_id, action: ArticleAction::Star }
    }

    pub fn unstar(article_id: i64) -> Self {
        Intent::ForArticle { article_id, action: ArticleAction::Unstar }
    }

    pub fn archive(article_id: i64) -> Self {
        Intent::ForArticle { article_id, action: ArticleAction::Archive }
    }

    pub fn delete(article_id: i64) -> Self {
        Intent::ForArticle { article_id, action: ArticleAction::Delete }
    }

    pub fn summarize(article_id: i64) -> Self {
        Intent::ForArticle { article_id, action: ArticleAction::Summarize }
    }

    pub fn add_url(url: impl Into<String>) -> Self {
        Intent::ForNewUrl { url: url.into() }
    }

    /// Check the intent before it is written to the log
    pub fn validate(&self) -> Result<(), SharedError> {
        match self {
            Intent::ForArticle { article_id, .. } if *article_id <= NEW_ARTICLE_SENTINEL => Err(
                SharedError::validation("article_id", format!("{article_id} is not a server article id")),
            ),
            Intent::ForNewUrl { url } if url.trim().is_empty() => {
                Err(SharedError::validation("url", "URL cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Article id column value; the sentinel for new URLs
    pub fn storage_article_id(&self) -> i64 {
        match self {
            Intent::ForArticle { article_id, .. } => *article_id,
            Intent::ForNewUrl { .. } => NEW_ARTICLE_SENTINEL,
        }
    }

    /// Action type column value
    pub fn action_type(&self) -> &'static str {
        match self {
            Intent::ForArticle { action, .. } => action.as_str(),
            Intent::ForNewUrl { .. } => ADD_ACTION_TYPE,
        }
    }

    /// URL column value
    pub fn url(&self) -> Option<&str> {
        match self {
            Intent::ForArticle { .. } => None,
            Intent::ForNewUrl { url } => Some(url),
        }
    }

    /// Rebuild an intent from its stored columns
    pub fn from_parts(article_id: i64, action_type: &str, url: Option<String>) -> Result<Self, SharedError> {
        if action_type == ADD_ACTION_TYPE {
            let url = url
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| SharedError::validation("url", "add action without a URL"))?;
            return Ok(Intent::ForNewUrl { url });
        }
        let action = ArticleAction::parse(action_type)?;
        Ok(Intent::ForArticle { article_id, action })
    }

    pub fn article_id(&self) -> Option<i64> {
        match self {
            Intent::ForArticle { article_id, .. } => Some(*article_id),
            Intent::ForNewUrl { .. } => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::ForArticle { article_id, action } => write!(f, "{action} article {article_id}"),
            Intent::ForNewUrl { url } => write!(f, "add {url}"),
        }
    }
}

/// One entry of the action log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Log row id, increasing in insertion order
    pub id: i64,
    pub intent: Intent,
    /// Creation time; ordering key of the log
    pub timestamp: DateTime<Utc>,
}
