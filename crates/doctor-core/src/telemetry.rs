//! Tracing initialisation for Computer Doctor binaries.
//!
//! Logs go to stderr so the report panel on stdout stays clean.
//! `RUST_LOG` overrides the default level when set.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Line format for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// Newline-delimited JSON for log aggregation.
    Json,
}

/// Initialise the global tracing subscriber.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(format: LogFormat, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()
            .ok(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init()
            .ok(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(LogFormat::Compact, Level::WARN);
        init_tracing(LogFormat::Json, Level::DEBUG);
        tracing::info!("still logging");
    }
}
