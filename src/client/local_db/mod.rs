//! # Local Database Module
//!
//! SQLite storage for the offline engine. Two tables matter:
//!
//! - **actions**: the action log, the durable queue of user intents that
//!   the server has not yet confirmed (see [`actions`]).
//! - **articles**: the local article cache, refreshed from the server and
//!   read by the applied-action cleanup (see [`articles`]).
//!
//! A small `sync_metadata` key/value table records sync timestamps.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notebrain_sync::client::local_db::LocalDatabase;
//! use notebrain_sync::shared::Intent;
//!
//! # async fn example() -> notebrain_sync::client::error::Result<()> {
//! let db = LocalDatabase::open_default().await?;
//! db.append(&Intent::star(42)).await?;
//! let pending = db.list_pending().await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod articles;
pub mod schema;

use crate::client::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// Local database connection manager
///
/// Owns the SQLite pool. Cheap to share behind an `Arc`; every method takes
/// `&self`.
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
}

impl LocalDatabase {
    /// Open or create the database at the platform data directory
    pub async fn open_default() -> Result<Self> {
        let path = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("notebrain")
            .join("local.db");
        Self::open(path).await
    }

    /// Open or create the database file at `path`
    ///
    /// Uses WAL mode so cache refreshes do not block log appends.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().max_connections(4).connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests and previews
    ///
    /// A single connection keeps every query on the same memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Apply every migration newer than the recorded schema version
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let current_version: (i32,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await?;

        for (version, statements) in schema::get_pending_migrations(current_version.0) {
            let mut tx = self.pool.begin().await?;
            for statement in statements {
                sqlx::query(statement).execute(&mut *tx).await?;
            }
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            tracing::debug!("[DB] Applied schema migration {}", version);
        }

        Ok(())
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Schema version currently recorded
    pub async fn schema_version(&self) -> Result<i32> {
        let row: (i32,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Basic statistics about the local database
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let article_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        let pending_actions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM actions")
            .fetch_one(&self.pool)
            .await?;

        Ok(DatabaseStats {
            article_count: article_count.0 as u64,
            pending_actions: pending_actions.0 as u64,
        })
    }

    /// Set sync metadata
    pub async fn set_sync_metadata(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO sync_metadata (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get sync metadata
    pub async fn get_sync_metadata(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM sync_metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    /// Last time a full article refresh completed
    pub async fn get_last_refresh_time(&self) -> Result<Option<String>> {
        self.get_sync_metadata("last_refresh_time").await
    }

    /// Record that a full article refresh completed now
    pub async fn set_last_refresh_time(&self) -> Result<()> {
        self.set_sync_metadata("last_refresh_time", &chrono::Utc::now().to_rfc3339())
            .await
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Articles in the local cache
    pub article_count: u64,
    /// Entries in the action log
    pub pending_actions: u64,
}
