//! Deferred scan completions.
//!
//! A [`ScanScheduler`] decides *when* a completion fires; the completion itself
//! decides *whether* it still applies by checking its token against the live
//! session. Aborting a timer is best-effort and never replaces that check.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::Instrument;

use super::phase::{DiagnosticSession, PendingScan, ScanOutcome};
use crate::error::{DoctorError, Result};
use crate::metrics::METRICS;
use crate::obs::{emit_scan_resolved, emit_scan_superseded};

/// A scan completion bound to the session that issued it.
#[derive(Debug)]
pub struct ScanCompletion {
    session: Weak<watch::Sender<DiagnosticSession>>,
    pending: PendingScan,
}

impl ScanCompletion {
    pub(crate) fn new(
        session: Weak<watch::Sender<DiagnosticSession>>,
        pending: PendingScan,
    ) -> Self {
        Self { session, pending }
    }

    pub fn pending(&self) -> &PendingScan {
        &self.pending
    }

    /// Deliver the completion. Subscribers are only notified on resolution.
    pub fn fire(self) -> ScanOutcome {
        let Some(session) = self.session.upgrade() else {
            return ScanOutcome::Abandoned;
        };

        let mut outcome = ScanOutcome::Abandoned;
        session.send_if_modified(|s| {
            outcome = s.complete(&self.pending);
            matches!(outcome, ScanOutcome::Resolved(_))
        });

        match &outcome {
            ScanOutcome::Resolved(selection) => {
                METRICS.inc_scans_resolved();
                emit_scan_resolved(selection.as_str(), self.pending.token.value());
            }
            ScanOutcome::Superseded { stale, current } => {
                METRICS.inc_scans_superseded();
                emit_scan_superseded(stale.value(), current.map(|t| t.value()));
            }
            ScanOutcome::Abandoned => {}
        }
        outcome
    }
}

/// Arranges for a completion to fire after a delay.
///
/// Implementations that can cancel their timers return an [`AbortHandle`];
/// the controller aborts the previous scan's timer when a new one starts.
pub trait ScanScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, completion: ScanCompletion) -> Option<AbortHandle>;
}

/// Production scheduler: one sleeping tokio task per scan.
#[derive(Debug, Clone)]
pub struct TokioScanScheduler {
    handle: Handle,
}

impl TokioScanScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| DoctorError::NoRuntime)
    }
}

impl ScanScheduler for TokioScanScheduler {
    fn schedule(&self, delay: Duration, completion: ScanCompletion) -> Option<AbortHandle> {
        let task = self.handle.spawn(
            async move {
                tokio::time::sleep(delay).await;
                completion.fire();
            }
            .in_current_span(),
        );
        Some(task.abort_handle())
    }
}

/// Test scheduler that queues completions instead of timing them.
///
/// Tests fire queued completions explicitly, in whatever order they need.
#[derive(Debug, Default)]
pub struct ManualScanScheduler {
    queue: Mutex<VecDeque<(Duration, ScanCompletion)>>,
}

impl ManualScanScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Remove every queued completion, oldest first, without firing them.
    pub fn drain(&self) -> Vec<ScanCompletion> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .map(|(_, c)| c)
            .collect()
    }

    /// Fire the oldest queued completion.
    pub fn fire_next(&self) -> Option<ScanOutcome> {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        next.map(|(_, c)| c.fire())
    }

    /// Fire every queued completion in scheduling order.
    pub fn fire_all(&self) -> Vec<ScanOutcome> {
        self.drain().into_iter().map(ScanCompletion::fire).collect()
    }

    /// Fire every queued completion newest first, as a runtime might if the
    /// later timer happened to wake before the earlier one.
    pub fn fire_all_reversed(&self) -> Vec<ScanOutcome> {
        self.drain().into_iter().rev().map(ScanCompletion::fire).collect()
    }

    /// Delays requested so far for the queued completions, oldest first.
    pub fn queued_delays(&self) -> Vec<Duration> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(d, _)| *d)
            .collect()
    }
}

impl ScanScheduler for ManualScanScheduler {
    fn schedule(&self, delay: Duration, completion: ScanCompletion) -> Option<AbortHandle> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back((delay, completion));
        None
    }
}
