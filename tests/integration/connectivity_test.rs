//! Connectivity-driven sync tests
//!
//! Background triggers: connectivity restore, the periodic timer and
//! appends.

use crate::common::*;
use assert_matches::assert_matches;
use notebrain_sync::client::{SyncConfig, SyncTrigger, TriggerOutcome};
use notebrain_sync::shared::Intent;
use std::time::Duration;
use wiremock::MockServer;

#[tokio::test]
async fn test_offline_star_syncs_on_reconnect() {
    let server = MockServer::start().await;
    mount_action(&server, "POST", "/api/articles/42/star", 200, 1).await;
    mount_article_list(&server, vec![article_json(42, true, "inbox")]).await;

    let (mut service, monitor) = build_service(&server, SyncConfig::default(), false).await;
    service.start();

    service.record(&Intent::star(42)).await.unwrap();
    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    assert_matches!(outcome, TriggerOutcome::Offline);
    crate::assert_pending!(service.database(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());

    monitor.set_connected(true);
    wait_for_empty_log(service.database()).await;
    service.stop().await;

    assert_eq!(requests_to(&server, "POST", "/api/articles/42/star").await, 1);
    assert!(service.database().get_article(42).await.unwrap().unwrap().starred);
}

#[tokio::test]
async fn test_append_while_connected_syncs() {
    let server = MockServer::start().await;
    mount_action(&server, "DELETE", "/api/articles/9", 204, 1).await;
    mount_article_list(&server, vec![]).await;

    let (mut service, _) = build_service(&server, SyncConfig::default(), true).await;
    service.start();

    service.record(&Intent::delete(9)).await.unwrap();
    wait_for_empty_log(service.database()).await;
    service.stop().await;

    assert_eq!(requests_to(&server, "DELETE", "/api/articles/9").await, 1);
}

#[tokio::test]
async fn test_periodic_timer_fires_only_while_connected() {
    let server = MockServer::start().await;
    mount_article_list(&server, vec![]).await;

    let sync = SyncConfig {
        sync_interval_seconds: 1,
        ..SyncConfig::default()
    };
    let (mut service, monitor) = build_service(&server, sync, false).await;
    service.start();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(requests_to(&server, "GET", "/api/articles").await, 0);

    // Restoring connectivity syncs once on its own; the timer keeps going after.
    monitor.set_connected(true);
    let server_ref = &server;
    wait_until(Duration::from_secs(5), move || async move {
        requests_to(server_ref, "GET", "/api/articles").await >= 2
    })
    .await;
    service.stop().await;

    let state = service.state().await.unwrap();
    assert!(state.is_connected);
    assert!(state.last_sync_attempt.is_some());
}

#[tokio::test]
async fn test_disabled_auto_sync_waits_for_explicit_trigger() {
    let server = MockServer::start().await;
    mount_action(&server, "POST", "/api/articles/3/unstar", 200, 1).await;
    mount_article_list(&server, vec![]).await;

    let (mut service, monitor) = build_service(&server, manual_sync(), false).await;
    service.start();
    service.record(&Intent::unstar(3)).await.unwrap();
    monitor.set_connected(true);

    tokio::time::sleep(Duration::from_millis(200)).await;
    crate::assert_pending!(service.database(), 1);

    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    assert_matches!(outcome, TriggerOutcome::Completed(_));
    crate::assert_pending!(service.database(), 0);
    service.stop().await;
}
