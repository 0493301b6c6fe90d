//! Diagnostic session orchestration.
//!
//! `Idle → Scanning(sel, token) → Resolved(sel) → Scanning(sel', token') → …`
//!
//! Every selection issues a new [`ScanToken`]. A completion only resolves the
//! session if its token still matches the live scan, so a late completion for
//! an earlier selection can never overwrite a later one, whatever order the
//! timers fire in.

pub mod controller;
pub mod phase;
pub mod scheduler;

pub use controller::DiagnosticController;
pub use phase::{DiagnosticSession, PendingScan, Phase, ScanOutcome, ScanToken};
pub use scheduler::{ManualScanScheduler, ScanCompletion, ScanScheduler, TokioScanScheduler};
