//! # Sync State
//!
//! Point-in-time snapshot of the engine for status displays. Rebuilt on
//! every request and never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncState {
    pub is_connected: bool,
    pub is_syncing: bool,
    pub last_sync_attempt: Option<DateTime<Utc>>,
    /// Last cycle that ran to the end, whatever its individual outcomes
    pub last_sync_completed: Option<DateTime<Utc>>,
    pub pending_actions: u64,
}
