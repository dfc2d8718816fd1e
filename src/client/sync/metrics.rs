//! # Sync Metrics
//!
//! Running counters over sync cycles and skipped triggers.

use super::CycleReport;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncMetrics {
    pub total_cycles: u64,
    /// Cycles whose post-sync refresh succeeded
    pub refreshed_cycles: u64,
    pub actions_applied: u64,
    pub actions_failed: u64,
    pub skipped_offline: u64,
    pub skipped_busy: u64,
    pub average_cycle_duration: Duration,
    pub last_cycle_duration: Option<Duration>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.total_cycles += 1;
        if report.refresh_error.is_none() {
            self.refreshed_cycles += 1;
        }
        self.actions_applied += report.applied as u64;
        self.actions_failed += report.failures.len() as u64;
        self.last_cycle_duration = Some(report.duration);

        // Rolling average in nanoseconds; u128 cannot overflow here
        let cycles = u128::from(self.total_cycles);
        let total = self.average_cycle_duration.as_nanos() * (cycles - 1) + report.duration.as_nanos();
        let average = total / cycles;
        self.average_cycle_duration = Duration::from_nanos(u64::try_from(average).unwrap_or(u64::MAX));
    }

    pub fn record_skipped_offline(&mut self) {
        self.skipped_offline += 1;
    }

    pub fn record_skipped_busy(&mut self) {
        self.skipped_busy += 1;
    }

    /// Share of delivered actions among all attempted
    pub fn delivery_rate(&self) -> f64 {
        let attempted = self.actions_applied + self.actions_failed;
        if attempted == 0 {
            0.0
        } else {
            self.actions_applied as f64 / attempted as f64
        }
    }
}
