//! # Applied-Action Cleanup
//!
//! Removes log entries whose effect is already visible in the local
//! article cache. Runs after every cache refresh and from the summarize
//! poller, which watches long-running summarize requests without a full
//! sync cycle.
//!
//! Confirmation rules, per intent:
//!
//! | intent      | confirmed when                               |
//! |-------------|----------------------------------------------|
//! | `summarize` | article present with a non-empty summary     |
//! | `archive`   | article absent, or present with archived status |
//! | `delete`    | article absent                               |
//! | `star`      | article present and starred                  |
//! | `unstar`    | article present and not starred              |
//! | add by URL  | never; the article has no id yet             |

use crate::client::error::Result;
use crate::client::local_db::LocalDatabase;
use crate::shared::{Article, ArticleAction, ArticleStatus, Intent};

/// Whether the intent's effect is visible in the cached article
pub fn is_reflected(intent: &Intent, article: Option<&Article>) -> bool {
    let Intent::ForArticle { action, .. } = intent else {
        return false;
    };

    match (action, article) {
        (ArticleAction::Summarize, Some(article)) => article.has_summary(),
        (ArticleAction::Archive, None) => true,
        (ArticleAction::Archive, Some(article)) => article.status == ArticleStatus::Archived,
        (ArticleAction::Delete, None) => true,
        (ArticleAction::Star, Some(article)) => article.starred,
        (ArticleAction::Unstar, Some(article)) => !article.starred,
        _ => false,
    }
}

/// Outcome of one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Pending entries inspected
    pub examined: usize,
    /// Entries deleted because their effect was confirmed
    pub removed: usize,
    /// Add-by-URL entries left alone
    pub skipped_new_urls: usize,
    /// Confirmed entries that could not be deleted or looked up
    pub failures: usize,
}

/// Delete every pending entry confirmed by the article cache
///
/// Individual lookup or delete errors are logged and counted; only a
/// failure to read the log itself is returned.
pub async fn cleanup_applied(db: &LocalDatabase) -> Result<CleanupReport> {
    let pending = db.list_pending().await?;
    let mut report = CleanupReport {
        examined: pending.len(),
        ..CleanupReport::default()
    };

    for action in &pending {
        let Some(article_id) = action.intent.article_id() else {
            report.skipped_new_urls += 1;
            continue;
        };

        let article = match db.get_article(article_id).await {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!("[CLEANUP] Could not read article {}: {}", article_id, e);
                report.failures += 1;
                continue;
            }
        };

        if !is_reflected(&action.intent, article.as_ref()) {
            continue;
        }

        match db.delete(action).await {
            Ok(_) => {
                tracing::debug!("[CLEANUP] Confirmed {} (#{})", action.intent, action.id);
                report.removed += 1;
            }
            Err(e) => {
                tracing::warn!("[CLEANUP] Failed to delete confirmed action #{}: {}", action.id, e);
                report.failures += 1;
            }
        }
    }

    if report.removed > 0 {
        tracing::info!("[CLEANUP] Removed {} confirmed action(s)", report.removed);
    }
    Ok(report)
}
