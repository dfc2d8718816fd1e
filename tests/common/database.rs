//! Local store and service fixtures

use notebrain_sync::client::{ArticleClient, Config, ConnectivityMonitor, LocalDatabase, SyncConfig, SyncService};
use notebrain_sync::shared::AppConfig;
use std::sync::Arc;
use wiremock::MockServer;

/// Fresh in-memory store with migrations applied
pub async fn setup_test_db() -> LocalDatabase {
    LocalDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Sync settings with every automatic trigger off
pub fn manual_sync() -> SyncConfig {
    SyncConfig {
        auto_sync: false,
        ..SyncConfig::default()
    }
}

/// Client configuration pointing at the mock server
pub fn config_for(server: &MockServer, sync: SyncConfig) -> Config {
    Config::with_builder(AppConfig::builder().server_url(server.uri()).api_token("test-token"))
        .expect("valid test configuration")
        .with_sync(sync)
}

/// Service wired to the mock server and a fresh store
pub async fn build_service(server: &MockServer, sync: SyncConfig, connected: bool) -> (SyncService, Arc<ConnectivityMonitor>) {
    let client = ArticleClient::new(config_for(server, sync)).expect("Failed to build client");
    let monitor = Arc::new(ConnectivityMonitor::new(connected));
    let service = SyncService::new(setup_test_db().await, client, Arc::clone(&monitor));
    (service, monitor)
}
