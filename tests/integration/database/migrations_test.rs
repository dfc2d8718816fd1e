//! Database migration tests
//!
//! Migrations run on open, are recorded, and leave the schema usable.

use crate::common::setup_test_db;
use notebrain_sync::client::local_db::schema::CURRENT_SCHEMA_VERSION;
use notebrain_sync::client::LocalDatabase;
use notebrain_sync::shared::Intent;

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = setup_test_db().await;
    assert_eq!(db.schema_version().await.unwrap(), CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_tables_exist() {
    let db = setup_test_db().await;
    for table in ["actions", "articles", "sync_metadata", "schema_migrations"] {
        let found: Option<(String,)> = sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(db.pool())
            .await
            .unwrap();
        assert!(found.is_some(), "{table} table should exist");
    }
}

#[tokio::test]
async fn test_log_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.db");

    let db = LocalDatabase::open(&path).await.unwrap();
    db.append(&Intent::summarize(11)).await.unwrap();
    db.append(&Intent::add_url("https://a.example")).await.unwrap();
    drop(db);

    let reopened = LocalDatabase::open(&path).await.unwrap();
    let intents: Vec<Intent> = reopened.list_pending().await.unwrap().into_iter().map(|a| a.intent).collect();
    assert_eq!(intents, vec![Intent::summarize(11), Intent::add_url("https://a.example")]);

    let migrations: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(reopened.pool())
        .await
        .unwrap();
    assert_eq!(migrations.0, i64::from(CURRENT_SCHEMA_VERSION));
}
