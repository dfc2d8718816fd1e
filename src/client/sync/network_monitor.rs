//! # Network Monitor
//!
//! Tracks whether the article server is reachable and raises an event on
//! each disconnected -> connected transition. Going offline, or reporting
//! "connected" while already connected, raises nothing.
//!
//! The platform feeds the monitor through [`ConnectivityMonitor::set_connected`];
//! headless builds can use [`ConnectivityMonitor::spawn_probe`], which polls
//! the server instead.

use crate::client::api::ArticleClient;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

/// Raised when connectivity comes back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityRestored {
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ConnectivityMonitor {
    connected: watch::Sender<bool>,
    restored: broadcast::Sender<ConnectivityRestored>,
}

impl ConnectivityMonitor {
    pub fn new(initially_connected: bool) -> Self {
        let (connected, _) = watch::channel(initially_connected);
        let (restored, _) = broadcast::channel(16);
        Self { connected, restored }
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    pub fn status(&self) -> NetworkStatus {
        if self.is_connected() {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }

    /// Record the current reachability; returns `true` on a restore edge
    pub fn set_connected(&self, connected: bool) -> bool {
        let was_connected = self.connected.send_replace(connected);
        match (was_connected, connected) {
            (false, true) => {
                tracing::info!("[NET] Connectivity restored");
                // No listener yet is fine; the state is still recorded.
                let _ = self.restored.send(ConnectivityRestored { at: Utc::now() });
                true
            }
            (true, false) => {
                tracing::info!("[NET] Connectivity lost");
                false
            }
            _ => false,
        }
    }

    /// Current state and later changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Restore edges only
    pub fn subscribe_restored(&self) -> broadcast::Receiver<ConnectivityRestored> {
        self.restored.subscribe()
    }

    /// Poll the server every `every` and feed the result into the monitor
    pub fn spawn_probe(self: &Arc<Self>, client: ArticleClient, every: Duration) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let reachable = client.probe().await;
                tracing::trace!("[NET] Probe: reachable={}", reachable);
                monitor.set_connected(reachable);
            }
        })
    }
}
