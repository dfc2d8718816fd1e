//! # Offline Action Handling
//!
//! Pure and store-level pieces of the offline engine that do not touch the
//! network.
//!
//! ## Key Components
//!
//! - `reconciliation.rs`: collapses the action log to one action per target
//! - `cleanup.rs`: removes log entries confirmed by the article cache
//! - `share_inbox.rs`: URLs captured by the share extension

pub mod cleanup;
pub mod reconciliation;
pub mod share_inbox;

pub use cleanup::{cleanup_applied, is_reflected, CleanupReport};
pub use reconciliation::{superseded, AddKeying, ReconcileKey, Reconciler};
pub use share_inbox::{extract_urls, ShareInbox};
