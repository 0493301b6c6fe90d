//! Terminal stand-ins for the scene, asset loader and print facility.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::debug;

use doctor_core::{
    emit_export_requested, AssetTracker, DiagnosticController, HighlightDirective, PrintExporter,
    SceneSink,
};

use crate::shell::describe_highlight;

/// Scene that prints each highlight directive it receives.
pub struct TerminalScene;

impl SceneSink for TerminalScene {
    fn apply_highlight(&self, directive: &HighlightDirective) {
        match serde_json::to_string(directive) {
            Ok(json) => debug!(directive = %json, "highlight applied"),
            Err(e) => debug!(error = %e, "highlight not serializable"),
        }
        if !directive.is_none() {
            println!("[scene] {}", describe_highlight(directive));
        }
    }
}

/// Exporter that writes the current report to stdout as markdown.
pub struct MarkdownExporter {
    controller: Arc<DiagnosticController>,
}

impl MarkdownExporter {
    pub fn new(controller: Arc<DiagnosticController>) -> Self {
        Self { controller }
    }

    pub fn render_to_stdout(controller: &DiagnosticController) {
        let view = controller.current_view();
        emit_export_requested(&view.title);
        println!("{}", view.render_markdown(Utc::now()));
    }
}

impl PrintExporter for MarkdownExporter {
    fn trigger(&self) {
        Self::render_to_stdout(&self.controller);
    }
}

/// Check the model asset in the background and record the result.
///
/// A missing asset only degrades the scene; the diagnostic session keeps working.
pub fn spawn_asset_loader(path: PathBuf, tracker: Arc<AssetTracker>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => tracker.mark_ready(),
            Ok(_) => tracker.mark_failed(format!("{} is not a file", path.display())),
            Err(e) => tracker.mark_failed(format!("{}: {}", path.display(), e)),
        }
    })
}
