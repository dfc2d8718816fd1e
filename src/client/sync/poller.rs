//! # Summarize Poller
//!
//! Summaries are produced server-side well after the `summarize` request
//! returns. While a summarize action is pending, the service periodically
//! refreshes the article cache and runs cleanup so the action disappears
//! once the summary shows up. An article stops being polled after the
//! polling window has elapsed since it was first seen.

use crate::shared::{ArticleAction, Intent, PendingAction};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Tracks when each pending summarize article was first seen
#[derive(Debug, Clone)]
pub struct SummaryPoller {
    window: Duration,
    first_seen: HashMap<i64, Instant>,
}

impl SummaryPoller {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            first_seen: HashMap::new(),
        }
    }

    /// Article ids still worth polling, in ascending order
    ///
    /// Articles without a pending summarize action are forgotten.
    pub fn due(&mut self, pending: &[PendingAction], now: Instant) -> Vec<i64> {
        let waiting: HashSet<i64> = pending
            .iter()
            .filter_map(|action| match action.intent {
                Intent::ForArticle {
                    article_id,
                    action: ArticleAction::Summarize,
                } => Some(article_id),
                _ => None,
            })
            .collect();

        self.first_seen.retain(|id, _| waiting.contains(id));

        let mut due: Vec<i64> = waiting
            .into_iter()
            .filter(|id| {
                let seen = *self.first_seen.entry(*id).or_insert(now);
                now.saturating_duration_since(seen) <= self.window
            })
            .collect();
        due.sort_unstable();
        due
    }

    /// Number of articles currently tracked
    pub fn tracked(&self) -> usize {
        self.first_seen.len()
    }
}
