//! # Reconciliation
//!
//! Collapses the raw action log into at most one effective action per
//! target before it is replayed against the server.
//!
//! Input is the log in timestamp order, so "last seen" is "most recent":
//! `star -> unstar -> star` collapses to `star` and `star -> delete`
//! collapses to `delete`. There is no type-aware priority.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notebrain_sync::client::offline::{AddKeying, Reconciler};
//!
//! # async fn example(db: notebrain_sync::client::local_db::LocalDatabase) -> notebrain_sync::client::error::Result<()> {
//! let snapshot = db.list_pending().await?;
//! let reconciled = Reconciler::new(AddKeying::PerUrl).reconcile(&snapshot);
//! # Ok(())
//! # }
//! ```

use crate::shared::{Intent, PendingAction};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Reconciliation key of one log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReconcileKey {
    /// An existing server article
    Article(i64),
    /// An add request, keyed by its URL
    NewUrl(String),
    /// Every add request at once (legacy sentinel keying)
    NewUrlSlot,
}

impl fmt::Display for ReconcileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileKey::Article(id) => write!(f, "article {id}"),
            ReconcileKey::NewUrl(url) => write!(f, "url {url}"),
            ReconcileKey::NewUrlSlot => f.write_str("new-article slot"),
        }
    }
}

/// How add-by-URL entries are keyed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddKeying {
    /// One slot per URL; concurrent adds of different URLs all survive
    #[default]
    PerUrl,
    /// All adds share the sentinel slot; only the most recent add survives
    SharedSentinel,
}

/// Collapses a log snapshot to one action per key
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    add_keying: AddKeying,
}

impl Reconciler {
    pub fn new(add_keying: AddKeying) -> Self {
        Self { add_keying }
    }

    pub fn add_keying(&self) -> AddKeying {
        self.add_keying
    }

    /// Key an entry is reconciled under
    pub fn key_for(&self, intent: &Intent) -> ReconcileKey {
        match (intent, self.add_keying) {
            (Intent::ForArticle { article_id, .. }, _) => ReconcileKey::Article(*article_id),
            (Intent::ForNewUrl { url }, AddKeying::PerUrl) => ReconcileKey::NewUrl(url.clone()),
            (Intent::ForNewUrl { .. }, AddKeying::SharedSentinel) => ReconcileKey::NewUrlSlot,
        }
    }

    /// Keep the last-seen entry per key
    ///
    /// `actions` must already be in log order. Iteration order of the
    /// result is unspecified.
    pub fn reconcile(&self, actions: &[PendingAction]) -> HashMap<ReconcileKey, PendingAction> {
        let mut reconciled = HashMap::with_capacity(actions.len());
        for action in actions {
            reconciled.insert(self.key_for(&action.intent), action.clone());
        }
        reconciled
    }
}

/// Snapshot entries that lost to a newer entry for the same key
pub fn superseded(
    snapshot: &[PendingAction],
    reconciled: &HashMap<ReconcileKey, PendingAction>,
) -> Vec<PendingAction> {
    let survivors: HashSet<i64> = reconciled.values().map(|a| a.id).collect();
    snapshot
        .iter()
        .filter(|a| !survivors.contains(&a.id))
        .cloned()
        .collect()
}
