//! # Remote Applier
//!
//! Turns one reconciled action into exactly one HTTP request and reports
//! the outcome. Nothing is retried here; a failed action is simply reported
//! and the cycle moves on.

use crate::client::api::{ArticleClient, Endpoint};
use crate::shared::{ArticleAction, Intent, PendingAction};
use futures_util::stream::{self, StreamExt};

/// REST call for an intent
///
/// The add-by-URL route, `POST /api/articles` with a `{"url": ...}` body, is
/// assumed: the server's documented action routes cover existing articles
/// only.
pub fn endpoint_for(intent: &Intent) -> Endpoint {
    match intent {
        Intent::ForArticle { article_id, action } => match action {
            ArticleAction::Star => Endpoint::post(format!("/api/articles/{article_id}/star")),
            ArticleAction::Unstar => Endpoint::post(format!("/api/articles/{article_id}/unstar")),
            ArticleAction::Archive => Endpoint::post(format!("/api/articles/{article_id}/read")),
            ArticleAction::Summarize => Endpoint::post(format!("/api/articles/{article_id}/summarize")),
            ArticleAction::Delete => Endpoint::delete(format!("/api/articles/{article_id}")),
        },
        Intent::ForNewUrl { url } => Endpoint::post("/api/articles").with_body(serde_json::json!({ "url": url })),
    }
}

/// Result of delivering one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Success,
    Failure { reason: String },
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Success)
    }
}

#[derive(Debug, Clone)]
pub struct RemoteApplier {
    client: ArticleClient,
}

impl RemoteApplier {
    pub fn new(client: ArticleClient) -> Self {
        Self { client }
    }

    /// Deliver one action
    pub async fn apply(&self, action: &PendingAction) -> ApplyOutcome {
        let endpoint = endpoint_for(&action.intent);
        match self.client.send(&endpoint).await {
            Ok(()) => {
                tracing::debug!("[APPLY] {} {} ok", endpoint.method.as_str(), endpoint.path);
                ApplyOutcome::Success
            }
            Err(e) => {
                tracing::warn!("[APPLY] {} (#{}) failed: {}", action.intent, action.id, e);
                ApplyOutcome::Failure { reason: e.to_string() }
            }
        }
    }

    /// Deliver a batch with at most `max_in_flight` requests outstanding
    ///
    /// Completion order is unspecified.
    pub async fn apply_all(&self, actions: Vec<PendingAction>, max_in_flight: usize) -> Vec<(PendingAction, ApplyOutcome)> {
        stream::iter(actions)
            .map(|action| async move {
                let outcome = self.apply(&action).await;
                (action, outcome)
            })
            .buffer_unordered(max_in_flight.max(1))
            .collect()
            .await
    }
}
