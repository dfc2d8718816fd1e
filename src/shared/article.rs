//! Article Data Model
//!
//! The server-side article as returned by `GET /api/articles` and the
//! archived listing. The sync engine only ever reads `id`, `starred`,
//! `status`, `archived_at` and `summary`; the remaining fields are carried
//! so the local cache can serve the reader views.
//!
//! Date fields are decoded leniently: a value that is not valid RFC 3339
//! becomes `None` rather than rejecting the whole article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Article lifecycle status on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArticleStatus {
    /// Unread, visible in the inbox
    Inbox,
    /// Marked read / archived
    Archived,
}

impl ArticleStatus {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Inbox => "inbox",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl From<String> for ArticleStatus {
    fn from(value: String) -> Self {
        ArticleStatus::from(value.as_str())
    }
}

impl From<&str> for ArticleStatus {
    fn from(value: &str) -> Self {
        match value {
            "archived" => ArticleStatus::Archived,
            _ => ArticleStatus::Inbox,
        }
    }
}

impl From<ArticleStatus> for String {
    fn from(value: ArticleStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Article as served by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub google_drive_file_id: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    pub status: ArticleStatus,
    #[serde(default)]
    pub starred: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub summarized_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Minimal article, mostly useful for fixtures
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            user_id: None,
            url: url.into(),
            title: String::new(),
            content: String::new(),
            excerpt: None,
            google_drive_file_id: None,
            featured_image: None,
            author: None,
            site_name: None,
            status: ArticleStatus::Inbox,
            starred: false,
            read_at: None,
            archived_at: None,
            summarized_at: None,
            summary: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the server has produced a summary for this article
    pub fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// One page of `GET /api/articles/archived`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedPage {
    pub data: Vec<Article>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl ArchivedPage {
    /// Whether another page can be requested after this one
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}
