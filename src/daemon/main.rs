/**
 * NoteBrain Sync Daemon
 *
 * Headless runner for the offline action engine: loads the installation
 * settings, opens the local store, probes the article server for
 * reachability, ingests URLs from the share inbox and keeps syncing until
 * interrupted.
 */

#[cfg(feature = "daemon")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use notebrain_sync::client::{ArticleClient, Config, ConnectivityMonitor, LocalDatabase, ShareInbox, SyncService};
    use std::sync::Arc;
    use std::time::Duration;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();
    tracing::info!("[STARTUP] notebrain-sync starting (RUST_LOG={})", env_filter);

    let config = Config::load_default()?;
    if !config.app().is_configured() {
        tracing::error!("[STARTUP] Server URL and API token are required");
        eprintln!("Set NOTEBRAIN_URL and NOTEBRAIN_API_TOKEN, or write them to the config file.");
        std::process::exit(1);
    }

    let db = LocalDatabase::open_default().await?;
    let stats = db.get_stats().await?;
    tracing::info!(
        "[STARTUP] Local store: {} cached article(s), {} pending action(s)",
        stats.article_count,
        stats.pending_actions
    );

    let client = ArticleClient::new(config.clone())?;
    let monitor = Arc::new(ConnectivityMonitor::new(false));
    let probe = monitor.spawn_probe(client.clone(), config.sync().probe_interval());

    let inbox = ShareInbox::default_location();
    tracing::info!("[STARTUP] Watching share inbox at {}", inbox.path().display());

    let mut service = SyncService::new(db, client, monitor);
    service.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut inbox_tick = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("[STARTUP] Shutdown requested");
                break;
            }
            _ = inbox_tick.tick() => {
                if let Err(e) = service.ingest_shared_urls(&inbox).await {
                    tracing::warn!("[INBOX] Failed to ingest shared URLs: {}", e);
                }
            }
        }
    }

    probe.abort();
    service.stop().await;
    Ok(())
}

#[cfg(not(feature = "daemon"))]
fn main() {
    eprintln!("The sync daemon requires the 'daemon' feature to be enabled.");
    eprintln!("Run with: cargo run --bin notebrain-sync --features daemon");
    std::process::exit(1);
}
