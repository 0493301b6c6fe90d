//! Structured observability hooks for the diagnostic lifecycle.
//!
//! This module provides:
//! - Session-scoped tracing spans via the `SessionSpan` RAII guard
//! - Emission functions for scans, knowledge-base loading, asset status and export
//!
//! Events use a stable `event` field so log pipelines can filter on them.

use std::time::Duration;

use tracing::{debug, info, warn};

/// RAII guard that enters a session-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = SessionSpan::enter(controller.session_id());
/// // every event below carries session_id
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    pub fn enter(session_id: uuid::Uuid) -> Self {
        Self {
            _span: session_span(session_id).entered(),
        }
    }
}

/// Session span for async code, to be attached with `Instrument::instrument`.
pub fn session_span(session_id: uuid::Uuid) -> tracing::Span {
    tracing::info_span!("doctor.session", session_id = %session_id)
}

/// Emit event: a scan was started.
pub fn emit_scan_started(selection: &str, token: u64, delay: Duration) {
    info!(
        event = "scan.started",
        selection = %selection,
        token = token,
        delay_ms = delay.as_millis() as u64,
    );
}

/// Emit event: a scan completed and the session resolved.
pub fn emit_scan_resolved(selection: &str, token: u64) {
    info!(event = "scan.resolved", selection = %selection, token = token);
}

/// Emit event: a completion arrived for a scan that was already superseded.
pub fn emit_scan_superseded(stale: u64, current: Option<u64>) {
    debug!(event = "scan.superseded", stale = stale, current = ?current);
}

/// Emit event: a knowledge base was loaded and validated.
pub fn emit_kb_loaded(source: &str, records: usize, digest: &str) {
    info!(
        event = "kb.loaded",
        source = %source,
        records = records,
        digest = %digest,
    );
}

/// Emit event: the scene asset changed state. Failures log at warn level.
pub fn emit_asset_status(status: &str, reason: Option<&str>) {
    match reason {
        Some(reason) => warn!(event = "asset.status", status = %status, reason = %reason),
        None => info!(event = "asset.status", status = %status),
    }
}

/// Emit event: the user asked for the report to be exported.
pub fn emit_export_requested(title: &str) {
    info!(event = "export.requested", title = %title);
}
