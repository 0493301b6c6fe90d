//! Boundaries to the external collaborators: the 3D scene, its asset loader
//! and the print/export facility.
//!
//! None of these feed back into the diagnostic session. Asset status is
//! tracked for the shell only, and the bridge task merely pushes highlight
//! directives outwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{DoctorError, Result};
use crate::highlight::{project, HighlightDirective};
use crate::obs::emit_asset_status;
use crate::session::DiagnosticController;

/// Consumer of highlight directives (the 3D scene).
pub trait SceneSink: Send + Sync {
    fn apply_highlight(&self, directive: &HighlightDirective);
}

/// Fire-and-forget export trigger (e.g. the platform print dialog).
pub trait PrintExporter: Send + Sync {
    fn trigger(&self);
}

/// Loading state of the 3D model asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed(String),
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Shell-side record of asset readiness.
#[derive(Debug)]
pub struct AssetTracker {
    tx: watch::Sender<AssetStatus>,
}

impl Default for AssetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AssetStatus::Pending);
        Self { tx }
    }

    pub fn mark_ready(&self) {
        self.tx.send_replace(AssetStatus::Ready);
        emit_asset_status("ready", None);
    }

    pub fn mark_failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        emit_asset_status("failed", Some(&reason));
        self.tx.send_replace(AssetStatus::Failed(reason));
    }

    pub fn status(&self) -> AssetStatus {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AssetStatus> {
        self.tx.subscribe()
    }
}

/// Push the current highlight to `sink` now and after every session change.
///
/// The task runs on the caller's tokio runtime, holds no reference to the
/// controller and exits once it is dropped. Fails with
/// [`DoctorError::NoRuntime`] when called outside a runtime.
pub fn spawn_scene_bridge(
    controller: &DiagnosticController,
    sink: Arc<dyn SceneSink>,
) -> Result<JoinHandle<()>> {
    let handle = Handle::try_current().map_err(|_| DoctorError::NoRuntime)?;
    let mut rx = controller.subscribe();
    let policy = controller.policy().clone();

    Ok(handle.spawn(async move {
        loop {
            let directive = {
                let session = rx.borrow_and_update();
                project(session.phase(), &policy)
            };
            sink.apply_highlight(&directive);

            if rx.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("scene bridge stopped");
    }))
}
