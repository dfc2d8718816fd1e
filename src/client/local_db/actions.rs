//! # Action Log
//!
//! Durable, append-only record of user intents waiting for the server.
//!
//! - Every append is written immediately; there is no batching.
//! - Entries are never updated. A change of mind is a newer entry.
//! - Reads are ordered by creation time, oldest first, ties broken by
//!   insertion order.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision, so ordering the text column orders by time.

use crate::client::error::Result;
use crate::client::local_db::LocalDatabase;
use crate::shared::{ArticleAction, Intent, PendingAction};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl LocalDatabase {
    /// Append a new intent stamped with the current time
    pub async fn append(&self, intent: &Intent) -> Result<PendingAction> {
        self.append_at(intent, Utc::now()).await
    }

    /// Append a new intent with an explicit creation time
    ///
    /// The stored time is truncated to microseconds.
    pub async fn append_at(&self, intent: &Intent, timestamp: DateTime<Utc>) -> Result<PendingAction> {
        intent.validate()?;
        let timestamp = timestamp.trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO actions (article_id, action_type, url, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(intent.storage_article_id())
        .bind(intent.action_type())
        .bind(intent.url())
        .bind(encode_timestamp(&timestamp))
        .execute(&self.pool)
        .await?;

        let action = PendingAction {
            id: result.last_insert_rowid(),
            intent: intent.clone(),
            timestamp,
        };
        tracing::debug!("[LOG] Queued {} (#{})", action.intent, action.id);
        Ok(action)
    }

    /// All pending actions, oldest first
    pub async fn list_pending(&self) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(
            "SELECT id, article_id, action_type, url, created_at
             FROM actions
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(decode_action_row).collect())
    }

    /// Pending actions of a single kind, oldest first
    pub async fn list_pending_of(&self, action: ArticleAction) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(
            "SELECT id, article_id, action_type, url, created_at
             FROM actions
             WHERE action_type = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(action.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(decode_action_row).collect())
    }

    /// Delete every entry; returns how many were removed
    pub async fn clear_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM actions").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete a single entry; `false` if it was already gone
    pub async fn delete(&self, action: &PendingAction) -> Result<bool> {
        let result = sqlx::query("DELETE FROM actions WHERE id = ?")
            .bind(action.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of pending entries (UI badge)
    pub async fn pending_count(&self) -> Result<u64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM actions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 as u64)
    }

    /// Whether an action of this kind is already queued for the article
    pub async fn has_pending(&self, article_id: i64, action: ArticleAction) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM actions WHERE article_id = ? AND action_type = ?")
            .bind(article_id)
            .bind(action.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }
}

/// Decode one row; rows that no longer parse are skipped with a warning
fn decode_action_row(row: &SqliteRow) -> Option<PendingAction> {
    let decoded = (|| -> Result<PendingAction> {
        let id: i64 = row.try_get("id")?;
        let article_id: i64 = row.try_get("article_id")?;
        let action_type: String = row.try_get("action_type")?;
        let url: Option<String> = row.try_get("url")?;
        let created_at: String = row.try_get("created_at")?;

        let intent = Intent::from_parts(article_id, &action_type, url)?;
        let timestamp = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| crate::shared::SharedError::validation("created_at", e.to_string()))?
            .with_timezone(&Utc);

        Ok(PendingAction { id, intent, timestamp })
    })();

    match decoded {
        Ok(action) => Some(action),
        Err(e) => {
            tracing::warn!("[LOG] Skipping unreadable action row: {}", e);
            None
        }
    }
}
