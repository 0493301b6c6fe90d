//! Process-wide scan counters.
//!
//! Increments only trace. The shell reads a [`ScanCounts`] snapshot for its
//! `status` command and calls [`Metrics::flush`] on exit.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters shared by every controller in the process.
pub static METRICS: Metrics = Metrics::new();

/// Point-in-time copy of the scan counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounts {
    pub started: u64,
    pub resolved: u64,
    pub superseded: u64,
}

impl ScanCounts {
    /// Scans neither resolved nor superseded yet (or abandoned with their controller).
    pub fn outstanding(&self) -> u64 {
        self.started
            .saturating_sub(self.resolved)
            .saturating_sub(self.superseded)
    }
}

#[derive(Debug, Default)]
pub struct Metrics {
    started: AtomicU64,
    resolved: AtomicU64,
    superseded: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            started: AtomicU64::new(0),
            resolved: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
        }
    }

    pub fn inc_scans_started(&self) {
        bump(&self.started, "scans_started");
    }

    pub fn inc_scans_resolved(&self) {
        bump(&self.resolved, "scans_resolved");
    }

    pub fn inc_scans_superseded(&self) {
        bump(&self.superseded, "scans_superseded");
    }

    pub fn snapshot(&self) -> ScanCounts {
        ScanCounts {
            started: self.started.load(Ordering::Relaxed),
            resolved: self.resolved.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
        }
    }

    /// Log the current totals as one `info` event.
    pub fn flush(&self) {
        let counts = self.snapshot();
        tracing::info!(
            metric = "flush",
            scans_started = counts.started,
            scans_resolved = counts.resolved,
            scans_superseded = counts.superseded,
            scans_outstanding = counts.outstanding(),
        );
    }
}

fn bump(counter: &AtomicU64, name: &'static str) {
    counter.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(metric = name, "counter incremented");
}
