//! Native Sync Client Module
//!
//! The offline action queue and the engine that replays it against the
//! article server.
//!
//! # Architecture
//!
//! - **`config`** - Installation settings and sync tunables
//! - **`error`** - Client error taxonomy
//! - **`api`** - REST client for the article server
//! - **`local_db`** - SQLite action log and article cache
//! - **`offline`** - Reconciliation, applied-action cleanup, share inbox
//! - **`sync`** - Connectivity monitor, scheduler, applier, sync service
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports and documentation
//! ├── config.rs     - Configuration loading
//! ├── error.rs      - ClientError
//! ├── api.rs        - ArticleClient
//! ├── local_db/     - SQLite store
//! ├── offline/      - Store-level offline logic
//! └── sync/         - Sync orchestration
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod local_db;
pub mod offline;
pub mod sync;

// Re-export commonly used types
pub use api::{ArticleClient, Endpoint, HttpMethod};
pub use config::Config;
pub use error::{ClientError, Result};
pub use local_db::LocalDatabase;
pub use offline::{AddKeying, Reconciler, ShareInbox};
pub use sync::{ClearPolicy, ConnectivityMonitor, CycleReport, SyncConfig, SyncService, SyncTrigger, TriggerOutcome};
