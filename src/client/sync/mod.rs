//! # Sync Service
//!
//! Replays the action log against the article server.
//!
//! ## Architecture
//!
//! The service owns, by injection at construction:
//! - **Action Log / Article Cache**: the [`LocalDatabase`]
//! - **Reconciler**: collapses the log to one action per target
//! - **Remote Applier**: one HTTP call per reconciled action
//! - **Connectivity Monitor**: reachability and restore edges
//! - **Scheduler**: the `Idle`/`Syncing` mutual-exclusion flag
//!
//! One cycle runs, in order: snapshot the log, reconcile, apply every
//! reconciled action (continuing past failures), clear the log according
//! to the [`ClearPolicy`], refresh the article cache from the server, and
//! run applied-action cleanup against the refreshed cache.
//!
//! The summarize poller and [`SyncService::redownload`] write to the cache
//! too, so they hold the same scheduler guard as a cycle.
//!
//! Every cycle runs on its own task. A caller that stops waiting does not
//! cancel it, so a cycle that has cleared the log always goes on to refresh
//! the cache.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notebrain_sync::client::api::ArticleClient;
//! use notebrain_sync::client::config::Config;
//! use notebrain_sync::client::local_db::LocalDatabase;
//! use notebrain_sync::client::sync::{ConnectivityMonitor, SyncService, SyncTrigger};
//! use notebrain_sync::shared::Intent;
//! use std::sync::Arc;
//!
//! # async fn example() -> notebrain_sync::client::error::Result<()> {
//! let config = Config::load_default()?;
//! let db = LocalDatabase::open_default().await?;
//! let client = ArticleClient::new(config)?;
//! let monitor = Arc::new(ConnectivityMonitor::new(true));
//!
//! let mut service = SyncService::new(db, client, monitor);
//! service.start();
//!
//! service.record(&Intent::star(42)).await?;
//! let outcome = service.sync_now(SyncTrigger::Explicit).await?;
//!
//! service.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod metrics;
pub mod network_monitor;
pub mod poller;
pub mod scheduler;
pub mod sync_state;

pub use applier::{endpoint_for, ApplyOutcome, RemoteApplier};
pub use metrics::SyncMetrics;
pub use network_monitor::{ConnectivityMonitor, ConnectivityRestored, NetworkStatus};
pub use poller::SummaryPoller;
pub use scheduler::{CycleGuard, SchedulerPhase, SyncScheduler};
pub use sync_state::SyncState;

use crate::client::api::ArticleClient;
use crate::client::error::Result;
use crate::client::local_db::articles::MergeStats;
use crate::client::local_db::LocalDatabase;
use crate::client::offline::{cleanup_applied, superseded, AddKeying, CleanupReport, Reconciler, ShareInbox};
use crate::shared::{ArchivedPage, ArticleAction, Intent, PendingAction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Configuration for the sync service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sync on connectivity restore, on the periodic timer and after appends
    pub auto_sync: bool,
    /// Periodic timer interval; the timer only fires while connected
    pub sync_interval_seconds: u64,
    /// Maximum requests in flight during the apply step
    pub max_concurrent_applies: usize,
    /// Per-request HTTP timeout
    pub request_timeout_seconds: u64,
    /// When log entries are removed after a cycle
    pub clear_policy: ClearPolicy,
    /// How add-by-URL entries are reconciled
    pub add_keying: AddKeying,
    pub summary_poll_interval_seconds: u64,
    /// How long a pending summarize keeps being polled
    pub summary_poll_window_seconds: u64,
    /// Reachability probe interval for headless runs
    pub probe_interval_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync: true,
            sync_interval_seconds: 120,
            max_concurrent_applies: 4,
            request_timeout_seconds: 30,
            clear_policy: ClearPolicy::default(),
            add_keying: AddKeying::default(),
            summary_poll_interval_seconds: 15,
            summary_poll_window_seconds: 60,
            probe_interval_seconds: 30,
        }
    }
}

impl SyncConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_seconds)
    }

    pub fn summary_poll_interval(&self) -> Duration {
        Duration::from_secs(self.summary_poll_interval_seconds)
    }

    pub fn summary_poll_window(&self) -> Duration {
        Duration::from_secs(self.summary_poll_window_seconds)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_seconds)
    }
}

/// When the log is cleared after the apply step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Clear the whole log once the apply loop ends, whatever the outcomes.
    /// A failed delivery is dropped.
    #[default]
    ClearOnSyncAttempt,
    /// Delete only superseded entries and delivered adds; everything else
    /// stays until cleanup sees its effect in the refreshed cache.
    ClearOnConfirmedEffect,
}

/// What asked for a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    ConnectivityRestored,
    PeriodicTimer,
    Explicit,
    ActionAppended,
    SharedUrls,
    /// Cache wiped and downloaded again
    Redownload,
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncTrigger::ConnectivityRestored => "connectivity restored",
            SyncTrigger::PeriodicTimer => "periodic timer",
            SyncTrigger::Explicit => "explicit",
            SyncTrigger::ActionAppended => "action appended",
            SyncTrigger::SharedUrls => "shared urls",
            SyncTrigger::Redownload => "redownload",
        };
        f.write_str(name)
    }
}

/// What happened to a trigger
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    Completed(CycleReport),
    /// Not connected; nothing was sent and the log is untouched
    Offline,
    /// Another cycle was running; the trigger was dropped
    AlreadySyncing,
}

impl TriggerOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            TriggerOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// An action the server did not accept this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    pub action: PendingAction,
    pub reason: String,
}

/// Summary of one sync cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub trigger: SyncTrigger,
    /// Log entries seen at the start of the cycle
    pub snapshot: usize,
    /// Entries left after reconciliation
    pub reconciled: usize,
    /// Entries delivered successfully
    pub applied: usize,
    pub failures: Vec<ApplyFailure>,
    /// Log entries removed by the clear step
    pub cleared: u64,
    pub refreshed: Option<MergeStats>,
    pub refresh_error: Option<String>,
    pub cleaned_up: CleanupReport,
    pub duration: Duration,
}

impl CycleReport {
    pub fn new(trigger: SyncTrigger) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            trigger,
            snapshot: 0,
            reconciled: 0,
            applied: 0,
            failures: Vec::new(),
            cleared: 0,
            refreshed: None,
            refresh_error: None,
            cleaned_up: CleanupReport::default(),
            duration: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct SyncTimes {
    last_attempt: Option<DateTime<Utc>>,
    last_completed: Option<DateTime<Utc>>,
}

/// State shared between the service handle and its background tasks
#[derive(Debug)]
struct SyncInner {
    config: SyncConfig,
    retention_days: u32,
    db: LocalDatabase,
    client: ArticleClient,
    reconciler: Reconciler,
    applier: RemoteApplier,
    monitor: Arc<ConnectivityMonitor>,
    scheduler: Arc<SyncScheduler>,
    times: RwLock<SyncTimes>,
    metrics: RwLock<SyncMetrics>,
}

/// Main sync service coordinator
#[derive(Debug)]
pub struct SyncService {
    inner: Arc<SyncInner>,
    background_tasks: Vec<JoinHandle<()>>,
}

impl SyncService {
    /// Wire the service from its collaborators
    ///
    /// Sync tunables and the archived retention window come from the
    /// client's configuration.
    pub fn new(db: LocalDatabase, client: ArticleClient, monitor: Arc<ConnectivityMonitor>) -> Self {
        let config = client.config().sync().clone();
        let retention_days = client.config().archived_retention_days();
        let inner = SyncInner {
            reconciler: Reconciler::new(config.add_keying),
            applier: RemoteApplier::new(client.clone()),
            config,
            retention_days,
            db,
            client,
            monitor,
            scheduler: Arc::new(SyncScheduler::new()),
            times: RwLock::new(SyncTimes::default()),
            metrics: RwLock::new(SyncMetrics::new()),
        };

        Self {
            inner: Arc::new(inner),
            background_tasks: Vec::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn database(&self) -> &LocalDatabase {
        &self.inner.db
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.inner.monitor
    }

    pub fn scheduler(&self) -> &Arc<SyncScheduler> {
        &self.inner.scheduler
    }

    pub fn is_running(&self) -> bool {
        !self.background_tasks.is_empty()
    }

    /// Start the periodic timer, the connectivity listener and the
    /// summarize poller
    ///
    /// With `auto_sync` off only the poller runs. Calling `start` twice is
    /// a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("[SYNC] Sync service is already running");
            return;
        }

        if self.inner.config.auto_sync {
            self.background_tasks.push(self.spawn_timer());
            self.background_tasks.push(self.spawn_connectivity_listener());
        }
        self.background_tasks.push(self.spawn_summary_poller());
        tracing::info!(
            "[SYNC] Started (interval {}s, policy {:?})",
            self.inner.config.sync_interval_seconds,
            self.inner.config.clear_policy
        );
    }

    /// Cancel background tasks and wait for an in-flight cycle to finish
    pub async fn stop(&mut self) {
        for handle in self.background_tasks.drain(..) {
            handle.abort();
        }
        self.inner.scheduler.wait_idle().await;
        tracing::info!("[SYNC] Stopped");
    }

    /// Resolve once no cycle is running
    pub async fn wait_idle(&self) {
        self.inner.scheduler.wait_idle().await;
    }

    /// Run a cycle now and wait for its outcome
    pub async fn sync_now(&self, trigger: SyncTrigger) -> Result<TriggerOutcome> {
        self.trigger(trigger).await?
    }

    /// Fire-and-forget form of [`sync_now`](Self::sync_now)
    ///
    /// The cycle runs on its own task; dropping the handle does not cancel it.
    pub fn trigger(&self, trigger: SyncTrigger) -> JoinHandle<Result<TriggerOutcome>> {
        tokio::spawn(Arc::clone(&self.inner).run(trigger))
    }

    /// Wipe the article cache and download it again
    ///
    /// With `apply_pending` the log is first replayed and cleared like a
    /// cycle; without it pending entries stay queued for the next cycle.
    /// Runs under the scheduler guard, so it reports `Offline` or
    /// `AlreadySyncing` the same way a trigger does.
    pub async fn redownload(&self, apply_pending: bool) -> Result<TriggerOutcome> {
        tokio::spawn(Arc::clone(&self.inner).redownload(apply_pending)).await?
    }

    /// Append an intent to the log, then ask for a sync
    pub async fn record(&self, intent: &Intent) -> Result<PendingAction> {
        let action = self.inner.db.append(intent).await.map_err(|e| {
            tracing::error!("[LOG] Failed to record {}: {}", intent, e);
            e
        })?;
        if self.inner.config.auto_sync {
            drop(self.trigger(SyncTrigger::ActionAppended));
        }
        Ok(action)
    }

    /// Queue one add per URL waiting in the share inbox
    ///
    /// The inbox is emptied only once every URL has been appended; blank
    /// entries are dropped with a warning. Returns the number queued.
    pub async fn ingest_shared_urls(&self, inbox: &ShareInbox) -> Result<usize> {
        let urls = inbox.pending()?;
        if urls.is_empty() {
            return Ok(0);
        }

        let mut queued = 0;
        for url in &urls {
            let intent = Intent::add_url(url.trim());
            if intent.validate().is_err() {
                tracing::warn!("[INBOX] Dropping blank shared URL");
                continue;
            }
            self.inner.db.append(&intent).await?;
            queued += 1;
        }
        inbox.acknowledge(&urls)?;
        tracing::info!("[INBOX] Queued {} shared URL(s)", queued);

        if queued > 0 {
            drop(self.trigger(SyncTrigger::SharedUrls));
        }
        Ok(queued)
    }

    /// Fetch one page of the archived listing and cache the recent entries
    pub async fn refresh_archived(&self, page: u32, page_size: u32) -> Result<ArchivedPage> {
        let archived = self.inner.client.fetch_archived(page, page_size).await?;
        self.inner
            .db
            .upsert_archived_page(&archived, self.inner.retention_days)
            .await?;
        Ok(archived)
    }

    /// Current status snapshot
    pub async fn state(&self) -> Result<SyncState> {
        let pending_actions = self.inner.db.pending_count().await?;
        let times = self.inner.times.read().await;
        Ok(SyncState {
            is_connected: self.inner.monitor.is_connected(),
            is_syncing: self.inner.scheduler.is_syncing(),
            last_sync_attempt: times.last_attempt,
            last_sync_completed: times.last_completed,
            pending_actions,
        })
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.inner.metrics.read().await.clone()
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(inner.config.sync_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if inner.monitor.is_connected() {
                    tokio::spawn(Arc::clone(&inner).run(SyncTrigger::PeriodicTimer));
                }
            }
        })
    }

    fn spawn_connectivity_listener(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let mut restored = inner.monitor.subscribe_restored();
        tokio::spawn(async move {
            loop {
                match restored.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        tokio::spawn(Arc::clone(&inner).run(SyncTrigger::ConnectivityRestored));
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn spawn_summary_poller(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut poller = SummaryPoller::new(inner.config.summary_poll_window());
            let mut interval = tokio::time::interval(inner.config.summary_poll_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(e) = inner.poll_summaries(&mut poller).await {
                    tracing::warn!("[SYNC] Summary poll failed: {}", e);
                }
            }
        })
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        for handle in self.background_tasks.drain(..) {
            handle.abort();
        }
    }
}

impl SyncInner {
    /// Connectivity and scheduler gate shared by every cache writer
    async fn begin(&self, trigger: SyncTrigger) -> std::result::Result<CycleGuard, TriggerOutcome> {
        if !self.monitor.is_connected() {
            tracing::debug!("[SYNC] Offline, ignoring {} trigger", trigger);
            self.metrics.write().await.record_skipped_offline();
            return Err(TriggerOutcome::Offline);
        }

        let Some(guard) = self.scheduler.try_begin() else {
            tracing::debug!("[SYNC] Cycle in progress, dropping {} trigger", trigger);
            self.metrics.write().await.record_skipped_busy();
            return Err(TriggerOutcome::AlreadySyncing);
        };
        self.times.write().await.last_attempt = Some(Utc::now());
        Ok(guard)
    }

    async fn finish(&self, report: &CycleReport) {
        self.times.write().await.last_completed = Some(Utc::now());
        self.metrics.write().await.record_cycle(report);
    }

    /// Gate a trigger on connectivity and the scheduler, then run a cycle
    async fn run(self: Arc<Self>, trigger: SyncTrigger) -> Result<TriggerOutcome> {
        let _guard = match self.begin(trigger).await {
            Ok(guard) => guard,
            Err(outcome) => return Ok(outcome),
        };

        let report = self.cycle(trigger).await?;
        self.finish(&report).await;
        Ok(TriggerOutcome::Completed(report))
    }

    async fn redownload(self: Arc<Self>, apply_pending: bool) -> Result<TriggerOutcome> {
        let _guard = match self.begin(SyncTrigger::Redownload).await {
            Ok(guard) => guard,
            Err(outcome) => return Ok(outcome),
        };

        let started = Instant::now();
        let mut report = CycleReport::new(SyncTrigger::Redownload);
        if apply_pending {
            self.apply_and_clear(&mut report).await?;
        }
        let wiped = self.db.clear_articles().await?;
        tracing::info!("[SYNC] Cleared {} cached article(s) for redownload", wiped);
        self.refresh_and_cleanup(&mut report).await;

        report.duration = started.elapsed();
        self.finish(&report).await;
        Ok(TriggerOutcome::Completed(report))
    }

    async fn cycle(&self, trigger: SyncTrigger) -> Result<CycleReport> {
        let started = Instant::now();
        let mut report = CycleReport::new(trigger);
        tracing::info!("[SYNC] Cycle {} started ({})", report.cycle_id, trigger);

        self.apply_and_clear(&mut report).await?;
        self.refresh_and_cleanup(&mut report).await;

        report.duration = started.elapsed();
        tracing::info!(
            "[SYNC] Cycle {} done: {} applied, {} failed, {} cleared in {:?}",
            report.cycle_id,
            report.applied,
            report.failures.len(),
            report.cleared,
            report.duration
        );
        Ok(report)
    }

    /// Snapshot, reconcile, apply and clear the log
    async fn apply_and_clear(&self, report: &mut CycleReport) -> Result<()> {
        let snapshot = self.db.list_pending().await?;
        let reconciled = self.reconciler.reconcile(&snapshot);
        report.snapshot = snapshot.len();
        report.reconciled = reconciled.len();

        let batch: Vec<PendingAction> = reconciled.values().cloned().collect();
        let mut delivered = Vec::new();
        for (action, outcome) in self.applier.apply_all(batch, self.config.max_concurrent_applies).await {
            match outcome {
                ApplyOutcome::Success => delivered.push(action),
                ApplyOutcome::Failure { reason } => report.failures.push(ApplyFailure { action, reason }),
            }
        }
        report.applied = delivered.len();

        report.cleared = match self.config.clear_policy {
            ClearPolicy::ClearOnSyncAttempt => match self.db.clear_all().await {
                Ok(cleared) => cleared,
                Err(e) => {
                    tracing::error!("[SYNC] Failed to clear action log: {}", e);
                    0
                }
            },
            ClearPolicy::ClearOnConfirmedEffect => {
                let delivered_adds = delivered
                    .iter()
                    .filter(|action| matches!(action.intent, Intent::ForNewUrl { .. }))
                    .cloned();
                let done: Vec<PendingAction> = superseded(&snapshot, &reconciled)
                    .into_iter()
                    .chain(delivered_adds)
                    .collect();
                self.delete_entries(&done).await
            }
        };
        Ok(())
    }

    async fn refresh_and_cleanup(&self, report: &mut CycleReport) {
        match self.refresh_cache().await {
            Ok(stats) => report.refreshed = Some(stats),
            Err(e) => {
                tracing::warn!("[SYNC] Article refresh failed: {}", e);
                report.refresh_error = Some(e.to_string());
            }
        }

        match cleanup_applied(&self.db).await {
            Ok(cleanup) => report.cleaned_up = cleanup,
            Err(e) => tracing::warn!("[SYNC] Cleanup failed: {}", e),
        }
    }

    async fn delete_entries(&self, entries: &[PendingAction]) -> u64 {
        let mut removed = 0;
        for entry in entries {
            match self.db.delete(entry).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("[SYNC] Failed to delete action #{}: {}", entry.id, e),
            }
        }
        removed
    }

    /// Pull the full article list and merge it into the cache
    async fn refresh_cache(&self) -> Result<MergeStats> {
        let articles = self.client.fetch_articles().await?;
        let stats = self.db.merge_full_refresh(&articles).await?;
        self.db.prune_archived(self.retention_days).await?;
        self.db.set_last_refresh_time().await?;
        tracing::debug!(
            "[SYNC] Refreshed {} article(s), dropped {}",
            stats.upserted,
            stats.removed
        );
        Ok(stats)
    }

    /// One poller tick; returns how many summarize actions were confirmed
    ///
    /// `None` when the tick was skipped because the client is offline or a
    /// cycle holds the scheduler.
    async fn poll_summaries(&self, poller: &mut SummaryPoller) -> Result<Option<usize>> {
        if !self.monitor.is_connected() {
            return Ok(None);
        }
        let Some(_guard) = self.scheduler.try_begin() else {
            return Ok(None);
        };

        let pending = self.db.list_pending_of(ArticleAction::Summarize).await?;
        let due = poller.due(&pending, Instant::now());
        if due.is_empty() {
            return Ok(Some(0));
        }

        tracing::debug!("[SYNC] Polling summaries for {:?}", due);
        self.refresh_cache().await?;
        let cleanup = cleanup_applied(&self.db).await?;
        Ok(Some(cleanup.removed))
    }
}
