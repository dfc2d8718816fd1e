//! Share inbox ingestion tests

use crate::common::*;
use notebrain_sync::client::offline::ShareInbox;
use notebrain_sync::client::{AddKeying, SyncConfig, SyncTrigger};
use notebrain_sync::shared::Intent;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_shared_urls_become_add_actions() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let inbox = ShareInbox::in_dir(dir.path());
    inbox
        .push_text("Two links: https://a.example/post and https://b.example/item?id=3")
        .unwrap();

    let (service, _) = build_service(&server, manual_sync(), true).await;
    assert_eq!(service.ingest_shared_urls(&inbox).await.unwrap(), 2);

    assert!(inbox.pending().unwrap().is_empty());
    let intents: Vec<Intent> = service
        .database()
        .list_pending()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.intent)
        .collect();
    assert_eq!(
        intents,
        vec![
            Intent::add_url("https://a.example/post"),
            Intent::add_url("https://b.example/item?id=3"),
        ]
    );
}

#[tokio::test]
async fn test_every_shared_url_is_posted() {
    let server = MockServer::start().await;
    for url in ["https://a.example", "https://b.example"] {
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .and(body_json(json!({ "url": url })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
    }
    mount_article_list(&server, vec![]).await;

    let dir = tempfile::tempdir().unwrap();
    let inbox = ShareInbox::in_dir(dir.path());
    inbox
        .push(&["https://a.example".to_string(), "https://b.example".to_string()])
        .unwrap();

    let (service, _) = build_service(&server, manual_sync(), true).await;
    service.ingest_shared_urls(&inbox).await.unwrap();

    let outcome = service.sync_now(SyncTrigger::SharedUrls).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.reconciled, 2);
    assert_eq!(report.applied, 2);
    crate::assert_pending!(service.database(), 0);
}

#[tokio::test]
async fn test_shared_sentinel_keying_keeps_latest_add_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(body_json(json!({ "url": "https://b.example" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_article_list(&server, vec![]).await;

    let sync = SyncConfig {
        add_keying: AddKeying::SharedSentinel,
        ..manual_sync()
    };
    let (service, _) = build_service(&server, sync, true).await;
    service.record(&Intent::add_url("https://a.example")).await.unwrap();
    service.record(&Intent::add_url("https://b.example")).await.unwrap();

    let outcome = service.sync_now(SyncTrigger::Explicit).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.reconciled, 1);
    assert_eq!(report.cleared, 2);
}

#[tokio::test]
async fn test_empty_inbox_is_a_no_op() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = build_service(&server, manual_sync(), true).await;

    assert_eq!(service.ingest_shared_urls(&ShareInbox::in_dir(dir.path())).await.unwrap(), 0);
    crate::assert_pending!(service.database(), 0);
}
