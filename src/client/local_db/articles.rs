//! # Article Cache
//!
//! Local copy of the server's articles. The sync engine refreshes it after
//! every cycle and the applied-action cleanup reads it to decide whether a
//! queued intent is already visible server-side. Reader views read it too,
//! but nothing in this crate writes article fields other than by copying
//! server state.

use crate::client::error::Result;
use crate::client::local_db::LocalDatabase;
use crate::shared::{ArchivedPage, Article, ArticleStatus};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

/// Outcome of a full refresh merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Articles inserted or updated
    pub upserted: usize,
    /// Cached inbox articles no longer returned by the server
    pub removed: u64,
}

impl LocalDatabase {
    /// Insert or update articles by server id
    pub async fn upsert_articles(&self, articles: &[Article]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for article in articles {
            upsert_article(&mut *tx, article).await?;
        }
        tx.commit().await?;
        Ok(articles.len())
    }

    /// Merge the full article list returned by `GET /api/articles`
    ///
    /// The full list is authoritative for the inbox: cached inbox articles
    /// missing from it were archived or deleted elsewhere and are dropped.
    /// Cached archived articles are left alone.
    pub async fn merge_full_refresh(&self, articles: &[Article]) -> Result<MergeStats> {
        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        let ids_json = serde_json::to_string(&ids)?;

        let mut tx = self.pool.begin().await?;
        for article in articles {
            upsert_article(&mut *tx, article).await?;
        }
        let removed = sqlx::query(
            "DELETE FROM articles
             WHERE status = 'inbox'
               AND id NOT IN (SELECT value FROM json_each(?))",
        )
        .bind(ids_json)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        tx.commit().await?;

        Ok(MergeStats {
            upserted: articles.len(),
            removed,
        })
    }

    /// Cache the archived articles of one listing page that fall inside the
    /// retention window; returns how many were stored
    pub async fn upsert_archived_page(&self, page: &ArchivedPage, retention_days: u32) -> Result<usize> {
        let cutoff = retention_cutoff(retention_days);
        let keep: Vec<Article> = page
            .data
            .iter()
            .filter(|a| a.archived_at.is_some_and(|at| at >= cutoff))
            .cloned()
            .collect();
        self.upsert_articles(&keep).await
    }

    /// Drop cached archived articles older than the retention window
    pub async fn prune_archived(&self, retention_days: u32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE status = 'archived' AND archived_at < ?")
            .bind(retention_cutoff(retention_days))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Look up a cached article by server id
    pub async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_article_row).transpose()
    }

    /// Cached articles, newest first, optionally filtered by status
    pub async fn list_articles(&self, status: Option<ArticleStatus>) -> Result<Vec<Article>> {
        let rows = match status {
            Some(status) => {
                sqlx::query("SELECT * FROM articles WHERE status = ? ORDER BY created_at DESC, id DESC")
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM articles ORDER BY created_at DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(decode_article_row).collect()
    }

    /// Remove one cached article
    pub async fn remove_article(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn article_count(&self) -> Result<u64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 as u64)
    }

    /// Empty the cache ahead of a clean redownload
    pub async fn clear_articles(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn retention_cutoff(retention_days: u32) -> DateTime<Utc> {
    Utc::now() - Duration::days(i64::from(retention_days))
}

async fn upsert_article(conn: &mut SqliteConnection, article: &Article) -> Result<()> {
    sqlx::query(
        "INSERT INTO articles (
            id, user_id, url, title, content, excerpt, google_drive_file_id,
            featured_image, author, site_name, status, starred, read_at,
            archived_at, summarized_at, summary, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            url = excluded.url,
            title = excluded.title,
            content = excluded.content,
            excerpt = excluded.excerpt,
            google_drive_file_id = excluded.google_drive_file_id,
            featured_image = excluded.featured_image,
            author = excluded.author,
            site_name = excluded.site_name,
            status = excluded.status,
            starred = excluded.starred,
            read_at = excluded.read_at,
            archived_at = excluded.archived_at,
            summarized_at = excluded.summarized_at,
            summary = excluded.summary,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at",
    )
    .bind(article.id)
    .bind(article.user_id)
    .bind(&article.url)
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.excerpt)
    .bind(&article.google_drive_file_id)
    .bind(&article.featured_image)
    .bind(&article.author)
    .bind(&article.site_name)
    .bind(article.status.as_str())
    .bind(article.starred)
    .bind(article.read_at)
    .bind(article.archived_at)
    .bind(article.summarized_at)
    .bind(&article.summary)
    .bind(article.created_at)
    .bind(article.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

fn decode_article_row(row: &SqliteRow) -> Result<Article> {
    let status: String = row.try_get("status")?;
    Ok(Article {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        google_drive_file_id: row.try_get("google_drive_file_id")?,
        featured_image: row.try_get("featured_image")?,
        author: row.try_get("author")?,
        site_name: row.try_get("site_name")?,
        status: ArticleStatus::from(status.as_str()),
        starred: row.try_get("starred")?,
        read_at: row.try_get("read_at")?,
        archived_at: row.try_get("archived_at")?,
        summarized_at: row.try_get("summarized_at")?,
        summary: row.try_get("summary")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
