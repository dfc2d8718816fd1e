//! # Sync Scheduler
//!
//! Mutual exclusion for sync cycles. The scheduler is either `Idle` or
//! `Syncing`; a cycle may only start from `Idle`, and a trigger that
//! arrives while a cycle is running is dropped, not queued.
//!
//! The phase lives in a `watch` channel so that entering `Syncing` is a
//! single synchronous compare-and-set, taken before the cycle's first
//! suspension point, and so that `stop()` can wait for the running cycle.

use std::sync::Arc;
use tokio::sync::watch;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Syncing,
}

/// Owner of the "a cycle is running" flag
#[derive(Debug)]
pub struct SyncScheduler {
    phase: watch::Sender<SchedulerPhase>,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncScheduler {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(SchedulerPhase::Idle);
        Self { phase }
    }

    /// Enter `Syncing` if idle
    ///
    /// The returned guard puts the scheduler back to `Idle` when dropped,
    /// including when the cycle fails or unwinds.
    pub fn try_begin(self: &Arc<Self>) -> Option<CycleGuard> {
        let entered = self.phase.send_if_modified(|phase| {
            if *phase == SchedulerPhase::Idle {
                *phase = SchedulerPhase::Syncing;
                true
            } else {
                false
            }
        });

        entered.then(|| CycleGuard {
            scheduler: Arc::clone(self),
        })
    }

    pub fn phase(&self) -> SchedulerPhase {
        *self.phase.borrow()
    }

    pub fn is_syncing(&self) -> bool {
        self.phase() == SchedulerPhase::Syncing
    }

    /// Watch phase changes (UI spinners)
    pub fn subscribe(&self) -> watch::Receiver<SchedulerPhase> {
        self.phase.subscribe()
    }

    /// Resolve once no cycle is running
    pub async fn wait_idle(&self) {
        let mut rx = self.phase.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|phase| *phase == SchedulerPhase::Idle).await;
    }
}

/// Held for the duration of one sync cycle
#[derive(Debug)]
pub struct CycleGuard {
    scheduler: Arc<SyncScheduler>,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.scheduler.phase.send_replace(SchedulerPhase::Idle);
    }
}
