//! Computer Doctor - terminal presentation shell
//!
//! Wires the diagnostic controller to terminal stand-ins for the external
//! collaborators (scene, asset loader, print/export).
//!
//! ## Commands
//!
//! - `shell` (default): interactive session reading selections from stdin
//! - `scan`: scan one component, print its report and exit
//! - `list`: print the component menu

mod collaborators;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Instrument, Level};

use doctor_core::{
    session_span, AssetTracker, ComponentId, DiagnosticController, DoctorConfig, LogFormat,
    PrintExporter, SessionSpan, METRICS,
};

use crate::collaborators::{spawn_asset_loader, MarkdownExporter, TerminalScene};

#[derive(Parser, Debug)]
#[command(name = "computer-doctor")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Simulated laptop hardware diagnostics", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Simulated scan length in milliseconds
    #[arg(long, global = true, env = "DOCTOR_SCAN_DELAY_MS", default_value_t = 1500)]
    scan_delay_ms: u64,

    /// Components highlighted with the critical tint (comma-separated)
    #[arg(
        long,
        global = true,
        env = "DOCTOR_THERMAL",
        value_delimiter = ',',
        default_value = "heat"
    )]
    thermal: Vec<ComponentId>,

    /// Alternate fault knowledge base (JSON array of records)
    #[arg(long, global = true, env = "DOCTOR_KB")]
    knowledge_base: Option<PathBuf>,

    /// 3D model asset handed to the scene
    #[arg(long, global = true, env = "DOCTOR_ASSET", default_value = "laptop.glb")]
    asset: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Interactive diagnostic session (default)
    Shell,

    /// Scan a single component and print its report
    Scan {
        /// Component id (usb, screen, heat, battery, ram, disk, wifi)
        component: String,

        /// Also print the exported markdown report
        #[arg(long)]
        export: bool,
    },

    /// List available components
    List,
}

impl Cli {
    fn config(&self) -> DoctorConfig {
        let config = DoctorConfig::default()
            .with_scan_delay(Duration::from_millis(self.scan_delay_ms))
            .with_thermal_components(self.thermal.iter().copied());
        match &self.knowledge_base {
            Some(path) => config.with_knowledge_base(path),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    doctor_core::init_tracing(format, level);

    let config = cli.config();
    config.validate().context("invalid configuration")?;

    let kb = config
        .load_knowledge_base()
        .context("Failed to load fault knowledge base")?;
    let controller = Arc::new(
        DiagnosticController::with_tokio(Arc::new(kb), &config)
            .context("Failed to start diagnostic controller")?,
    );

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let span = session_span(controller.session_id());
            cmd_shell(Arc::clone(&controller), cli.asset)
                .instrument(span)
                .await
        }
        Commands::Scan { component, export } => {
            let span = session_span(controller.session_id());
            cmd_scan(&controller, &component, export)
                .instrument(span)
                .await
        }
        Commands::List => cmd_list(&controller),
    };

    METRICS.flush();
    result
}

/// Run the interactive session
async fn cmd_shell(controller: Arc<DiagnosticController>, asset: PathBuf) -> Result<()> {
    let assets = Arc::new(AssetTracker::new());
    spawn_asset_loader(asset, Arc::clone(&assets));

    let scene = Arc::new(TerminalScene);
    let bridge = doctor_core::spawn_scene_bridge(&controller, scene)
        .context("Failed to start scene bridge")?;
    let exporter: Arc<dyn PrintExporter> =
        Arc::new(MarkdownExporter::new(Arc::clone(&controller)));

    info!(
        components = controller.list_available_components().len(),
        scan_delay_ms = controller.scan_delay().as_millis() as u64,
        "diagnostic shell started"
    );
    let result = shell::run(Arc::clone(&controller), assets, exporter).await;
    bridge.abort();
    result
}

/// Scan one component and print the resolved report
async fn cmd_scan(controller: &DiagnosticController, component: &str, export: bool) -> Result<()> {
    let mut rx = controller.subscribe();
    controller.select_component(component);
    println!("Scanning {}... ANALYZING HARDWARE", component);

    loop {
        rx.changed().await.context("diagnostic session closed")?;
        if rx.borrow_and_update().phase().resolved().is_some() {
            break;
        }
    }

    print!("{}", controller.current_view().render_text());
    println!("[scene] {}", shell::describe_highlight(&controller.current_highlight()));
    if export {
        MarkdownExporter::render_to_stdout(controller);
    }
    Ok(())
}

/// Print the component menu
fn cmd_list(controller: &DiagnosticController) -> Result<()> {
    let _span = SessionSpan::enter(controller.session_id());
    for entry in controller.menu() {
        println!("  {:<8} {}", entry.id.as_str(), entry.label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_to_default_config() {
        let cli = Cli::try_parse_from(["computer-doctor"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config(), DoctorConfig::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "computer-doctor",
            "--scan-delay-ms",
            "250",
            "--thermal",
            "heat,battery",
            "--knowledge-base",
            "faults.json",
            "scan",
            "ram",
            "--export",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.scan_delay, Duration::from_millis(250));
        assert!(config.thermal_components.contains(&ComponentId::Battery));
        assert_eq!(config.knowledge_base, Some(PathBuf::from("faults.json")));
        assert_eq!(
            cli.command,
            Some(Commands::Scan {
                component: "ram".to_string(),
                export: true
            })
        );
    }

    #[test]
    fn test_unknown_thermal_component_is_rejected() {
        let err = Cli::try_parse_from(["computer-doctor", "--thermal", "gpu"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown component id: gpu"), "{msg}");
        assert!(!msg.contains("knowledge base"), "{msg}");
    }
}
