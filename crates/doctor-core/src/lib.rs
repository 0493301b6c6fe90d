//! Computer Doctor Core Library
//!
//! Diagnostic orchestration and fault knowledge engine: resolves component
//! selections to fault records after a simulated scan, guards against stale
//! scan completions, and projects the session onto highlight directives and
//! report views for the presentation layer.

pub mod config;
pub mod error;
pub mod highlight;
pub mod knowledge;
pub mod metrics;
pub mod obs;
pub mod report;
pub mod scene;
pub mod session;
pub mod telemetry;

pub use config::{DoctorConfig, DEFAULT_SCAN_DELAY, MAX_SCAN_DELAY};
pub use error::{DoctorError, Result};
pub use highlight::{project, HighlightDirective, HighlightPolicy, Tint};
pub use knowledge::{ComponentId, FaultKnowledgeBase, FaultRecord, Percent, RiskLevel, Selection};
pub use report::{menu_entries, MenuEntry, ReportView};
pub use scene::{spawn_scene_bridge, AssetStatus, AssetTracker, PrintExporter, SceneSink};
pub use session::{
    DiagnosticController, DiagnosticSession, ManualScanScheduler, PendingScan, Phase,
    ScanCompletion, ScanOutcome, ScanScheduler, ScanToken, TokioScanScheduler,
};

pub use metrics::{ScanCounts, METRICS};
pub use obs::{
    emit_asset_status, emit_export_requested, emit_kb_loaded, emit_scan_resolved,
    emit_scan_started, emit_scan_superseded, session_span, SessionSpan,
};
pub use telemetry::{init_tracing, LogFormat};

/// Computer Doctor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
