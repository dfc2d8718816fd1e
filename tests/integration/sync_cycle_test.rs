//! Sync cycle tests
//!
//! End-to-end cycles: snapshot, reconcile, apply, clear, refresh, cleanup.

use crate::common::*;
use assert_matches::assert_matches;
use notebrain_sync::client::{ClearPolicy, SyncConfig, SyncTrigger, TriggerOutcome};
use notebrain_sync::shared::Intent;
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::MockServer;

#[tokio::test]
async fn test_failed_apply_still_empties_log() {
    let server = MockServer::start().await;
    mount_action(&server, "POST", "/api/articles/1/star", 500, 1).await;
    mount_article_list(&server, vec![article_json(1, false, "inbox")]).await;

    let (service, _) = build_service(&server, manual_sync(), true).await;
    service.record(&Intent::star(1)).await.unwrap();

    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.applied, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].action.intent, Intent::star(1));
    assert_eq!(report.cleared, 1);
    crate::assert_pending!(service.database(), 0);
}

#[tokio::test]
async fn test_simultaneous_triggers_run_one_cycle() {
    let server = MockServer::start().await;
    mount_slow_action(&server, "POST", "/api/articles/1/read", Duration::from_millis(300), 1).await;
    mount_article_list(&server, vec![]).await;

    let (service, _) = build_service(&server, manual_sync(), true).await;
    service.record(&Intent::archive(1)).await.unwrap();

    let (first, second) = tokio::join!(
        service.sync_now(SyncTrigger::Explicit),
        service.sync_now(SyncTrigger::PeriodicTimer)
    );
    let outcomes = [first.unwrap(), second.unwrap()];

    let completed = outcomes
        .iter()
        .filter(|o| matches!(o, TriggerOutcome::Completed(_)))
        .count();
    let dropped = outcomes
        .iter()
        .filter(|o| matches!(o, TriggerOutcome::AlreadySyncing))
        .count();
    assert_eq!((completed, dropped), (1, 1));
    assert_eq!(requests_to(&server, "POST", "/api/articles/1/read").await, 1);
    assert_eq!(service.metrics().await.skipped_busy, 1);
}

#[tokio::test]
async fn test_reconciled_actions_hit_their_endpoints() {
    let server = MockServer::start().await;
    mount_action(&server, "DELETE", "/api/articles/2", 204, 1).await;
    mount_action(&server, "POST", "/api/articles/3/summarize", 202, 1).await;
    mount_action(&server, "POST", "/api/articles/2/star", 200, 0).await;
    mount_article_list(&server, vec![article_json(3, false, "inbox")]).await;

    let (service, _) = build_service(&server, manual_sync(), true).await;
    service.record(&Intent::star(2)).await.unwrap();
    service.record(&Intent::delete(2)).await.unwrap();
    service.record(&Intent::summarize(3)).await.unwrap();

    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.snapshot, 3);
    assert_eq!(report.reconciled, 2);
    assert_eq!(report.applied, 2);
    assert!(service.database().get_article(3).await.unwrap().is_some());
}

#[tokio::test]
async fn test_confirmed_effect_retries_until_visible() {
    let server = MockServer::start().await;
    mount_action_once(&server, "POST", "/api/articles/5/star", 500).await;
    mount_action_once(&server, "POST", "/api/articles/5/star", 200).await;
    mount_article_list_once(&server, vec![article_json(5, false, "inbox")]).await;
    mount_article_list_once(&server, vec![article_json(5, true, "inbox")]).await;

    let sync = SyncConfig {
        clear_policy: ClearPolicy::ClearOnConfirmedEffect,
        ..manual_sync()
    };
    let (service, _) = build_service(&server, sync, true).await;
    service.record(&Intent::star(5)).await.unwrap();

    let first = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    assert_eq!(first.report().unwrap().failures.len(), 1);
    crate::assert_pending!(service.database(), 1);

    let second = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    let report = second.report().unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.cleared, 0);
    assert_eq!(report.cleaned_up.removed, 1);
    crate::assert_pending!(service.database(), 0);
}

#[tokio::test]
async fn test_refresh_drops_articles_removed_on_server() {
    let server = MockServer::start().await;
    mount_article_list_once(&server, vec![article_json(1, false, "inbox"), article_json(2, false, "inbox")]).await;
    mount_article_list_once(&server, vec![article_json(2, false, "inbox")]).await;

    let (service, _) = build_service(&server, manual_sync(), true).await;

    service.sync_now(SyncTrigger::Explicit).await.unwrap();
    assert_eq!(service.database().article_count().await.unwrap(), 2);

    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    assert_matches!(outcome, TriggerOutcome::Completed(ref report) if report.refreshed.map(|s| s.removed) == Some(1));
    assert!(service.database().get_article(1).await.unwrap().is_none());
    assert!(service.database().get_last_refresh_time().await.unwrap().is_some());
}
