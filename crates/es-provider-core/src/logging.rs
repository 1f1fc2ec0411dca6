//! Tracing subscriber setup.
//!
//! A provider process talks to its orchestrator over stdout, so every
//! formatter here writes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ProviderError, ProviderResult};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, single line per event.
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter` (e.g. `"info,es_security_provider=debug"`).
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn try_init_logging(filter: &str, format: LogFormat) -> ProviderResult<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| ProviderError::configuration(format!("invalid log filter '{filter}': {e}")))?;

    let registry = tracing_subscriber::registry().with(filter_layer);
    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .flatten_event(true),
            )
            .try_init(),
    };
    result.map_err(|e| ProviderError::configuration(format!("logging already initialized: {e}")))?;

    tracing::info!(filter = %filter, ?format, "Logging initialized");
    Ok(())
}

/// Initialize the global subscriber, reporting failures on stderr only.
pub fn init_logging(filter: &str, format: LogFormat) {
    if let Err(e) = try_init_logging(filter, format) {
        eprintln!("WARN: {e}");
    }
}

/// Initialize logging for tests (with simpler output).
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
