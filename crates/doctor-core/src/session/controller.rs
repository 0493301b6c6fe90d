//! The diagnostic controller: owns the session and drives scans.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::instrument;
use uuid::Uuid;

use super::phase::{DiagnosticSession, PendingScan, Phase, ScanToken};
use super::scheduler::{ScanCompletion, ScanScheduler, TokioScanScheduler};
use crate::config::DoctorConfig;
use crate::error::Result;
use crate::highlight::{project, HighlightDirective, HighlightPolicy};
use crate::knowledge::{ComponentId, FaultKnowledgeBase, FaultRecord, Selection};
use crate::metrics::METRICS;
use crate::obs::emit_scan_started;
use crate::report::{menu_entries, MenuEntry, ReportView};

/// Finite state machine behind the presentation layer.
///
/// Construct one per process and hand it to the shell explicitly, usually as
/// an `Arc<DiagnosticController>`. All reads are cheap snapshots; the only
/// mutator is [`select_component`](Self::select_component), which returns
/// without waiting for the scan.
pub struct DiagnosticController {
    session_id: Uuid,
    kb: Arc<FaultKnowledgeBase>,
    policy: HighlightPolicy,
    scan_delay: Duration,
    session: Arc<watch::Sender<DiagnosticSession>>,
    scheduler: Arc<dyn ScanScheduler>,
    // Held for the whole of `select_component` so selections are serialized.
    in_flight: Mutex<Option<AbortHandle>>,
}

impl std::fmt::Debug for DiagnosticController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticController")
            .field("session_id", &self.session_id)
            .field("phase", self.session.borrow().phase())
            .field("scan_delay", &self.scan_delay)
            .finish_non_exhaustive()
    }
}

impl DiagnosticController {
    pub fn new(
        kb: Arc<FaultKnowledgeBase>,
        config: &DoctorConfig,
        scheduler: Arc<dyn ScanScheduler>,
    ) -> Self {
        let (tx, _rx) = watch::channel(DiagnosticSession::new());
        Self {
            session_id: Uuid::new_v4(),
            kb,
            policy: config.highlight_policy(),
            scan_delay: config.scan_delay,
            session: Arc::new(tx),
            scheduler,
            in_flight: Mutex::new(None),
        }
    }

    /// Controller whose scans are timed on the current tokio runtime.
    pub fn with_tokio(kb: Arc<FaultKnowledgeBase>, config: &DoctorConfig) -> Result<Self> {
        let scheduler = TokioScanScheduler::current()?;
        Ok(Self::new(kb, config, Arc::new(scheduler)))
    }

    /// Start a scan of `selection`, superseding any scan in flight.
    ///
    /// The session is `Scanning` by the time this returns. Unknown ids are
    /// accepted and resolve to the standby record.
    #[instrument(skip(self, selection), fields(session_id = %self.session_id))]
    pub fn select_component(&self, selection: impl Into<Selection>) -> ScanToken {
        let selection = selection.into();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        let mut token = ScanToken::ZERO;
        self.session
            .send_modify(|s| token = s.begin_scan(selection.clone()));

        METRICS.inc_scans_started();
        emit_scan_started(selection.as_str(), token.value(), self.scan_delay);

        let completion = ScanCompletion::new(
            Arc::downgrade(&self.session),
            PendingScan { selection, token },
        );
        *in_flight = self.scheduler.schedule(self.scan_delay, completion);
        token
    }

    pub fn current_phase(&self) -> Phase {
        self.session.borrow().phase().clone()
    }

    /// Standby record unless a scan has resolved.
    pub fn current_report(&self) -> &FaultRecord {
        match self.session.borrow().phase().resolved() {
            Some(selection) => self.kb.lookup(selection),
            None => FaultRecord::standby(),
        }
    }

    pub fn current_highlight(&self) -> HighlightDirective {
        project(self.session.borrow().phase(), &self.policy)
    }

    pub fn current_view(&self) -> ReportView {
        ReportView::project(self.session.borrow().phase(), &self.kb)
    }

    pub fn status_label(&self) -> &'static str {
        self.session.borrow().phase().label()
    }

    pub fn list_available_components(&self) -> Vec<ComponentId> {
        self.kb.list_component_ids()
    }

    pub fn menu(&self) -> Vec<MenuEntry> {
        menu_entries(&self.kb, self.session.borrow().phase())
    }

    /// Receiver notified on every phase change.
    pub fn subscribe(&self) -> watch::Receiver<DiagnosticSession> {
        self.session.subscribe()
    }

    pub fn knowledge_base(&self) -> &FaultKnowledgeBase {
        &self.kb
    }

    pub fn policy(&self) -> &HighlightPolicy {
        &self.policy
    }

    pub fn scan_delay(&self) -> Duration {
        self.scan_delay
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Drop for DiagnosticController {
    fn drop(&mut self) {
        let in_flight = self
            .in_flight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
    }
}
