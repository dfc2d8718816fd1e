//! NoteBrain Sync - Offline Action Engine
//!
//! Local-first core of the NoteBrain read-it-later client. User intents
//! (star, unstar, archive, delete, summarize, add by URL) are written to a
//! durable action log first and replayed against the article server when
//! connectivity allows.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Article wire model, queued intents
//!   - Installation configuration
//!   - Error types
//!
//! - **`client`** - Native engine (not compiled for WASM)
//!   - SQLite action log and article cache
//!   - Reconciliation and applied-action cleanup
//!   - Sync service: scheduler, connectivity monitor, remote applier
//!
//! # Feature Flags
//!
//! - **`daemon`** - Builds the `notebrain-sync` headless runner with
//!   `tracing-subscriber` output and `.env` loading
//!
//! # Usage
//!
//! ```rust,no_run
//! use notebrain_sync::client::{ArticleClient, Config, ConnectivityMonitor, LocalDatabase, SyncService, SyncTrigger};
//! use notebrain_sync::shared::Intent;
//! use std::sync::Arc;
//!
//! # async fn example() -> notebrain_sync::client::Result<()> {
//! let client = ArticleClient::new(Config::load_default()?)?;
//! let db = LocalDatabase::open_default().await?;
//! let service = SyncService::new(db, client, Arc::new(ConnectivityMonitor::new(true)));
//!
//! service.record(&Intent::archive(7)).await?;
//! service.sync_now(SyncTrigger::Explicit).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and serialization
//! - `shared::ConfigError` for configuration
//! - `client::ClientError` for everything the engine does at runtime
//!
//! Library code never panics on I/O; failures are returned to the caller.

/// Shared types and data structures
pub mod shared;

/// Native sync engine
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod client;
