//! Interactive line-oriented shell over a diagnostic controller.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use doctor_core::{
    AssetTracker, DiagnosticController, HighlightDirective, Phase, PrintExporter, METRICS,
};

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Select(String),
    List,
    Report,
    Status,
    Export,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse a line. Anything unrecognized is treated as a component selection.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Self::Empty;
        };
        match head.to_ascii_lowercase().as_str() {
            "select" | "scan" => Self::Select(words.collect::<Vec<_>>().join(" ")),
            "list" | "ls" => Self::List,
            "report" => Self::Report,
            "status" => Self::Status,
            "export" | "print" => Self::Export,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Select(line.to_string()),
        }
    }
}

const HELP: &str = "\
commands:
  <id> | select <id>   scan a component (usb, screen, heat, battery, ram, disk, wifi)
  list                 show the component menu
  report               show the current report
  status               show session and asset status
  export               print the report as markdown
  quit                 leave the shell";

/// One-line description of a highlight directive.
pub fn describe_highlight(directive: &HighlightDirective) -> String {
    match directive {
        HighlightDirective::None => "no highlight".to_string(),
        HighlightDirective::Emphasize {
            component_id,
            color_class,
        } => format!("emphasize {} ({})", component_id, color_class.as_str()),
    }
}

/// Read commands from stdin until EOF or `quit`.
pub async fn run(
    controller: Arc<DiagnosticController>,
    assets: Arc<AssetTracker>,
    exporter: Arc<dyn PrintExporter>,
) -> Result<()> {
    let renderer = spawn_renderer(&controller);

    println!("Computer Doctor {}", doctor_core::VERSION);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Select(id) => {
                if id.is_empty() {
                    warn!("select needs a component id");
                    continue;
                }
                let token = controller.select_component(id.as_str());
                debug!(%token, "selection submitted");
            }
            ShellCommand::List => {
                for entry in controller.menu() {
                    let marker = if entry.active { "*" } else { " " };
                    println!(" {} {:<8} {}", marker, entry.id.as_str(), entry.label);
                }
            }
            ShellCommand::Report => print!("{}", controller.current_view().render_text()),
            ShellCommand::Status => {
                println!("session: {}", controller.status_label());
                println!("asset:   {}", assets.status().as_str());
                let counts = METRICS.snapshot();
                println!(
                    "scans:   {} started, {} resolved, {} superseded",
                    counts.started, counts.resolved, counts.superseded
                );
            }
            ShellCommand::Export => exporter.trigger(),
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => break,
        }
    }

    renderer.abort();
    Ok(())
}

/// Print the status line on every change and the full report once resolved.
fn spawn_renderer(controller: &Arc<DiagnosticController>) -> tokio::task::JoinHandle<()> {
    let mut rx = controller.subscribe();
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().phase().clone();
            match phase {
                Phase::Scanning { selection, .. } => {
                    println!("Scanning {}... ANALYZING HARDWARE", selection)
                }
                Phase::Resolved { .. } => print!("{}", controller.current_view().render_text()),
                Phase::Idle => {}
            }
        }
    })
}
