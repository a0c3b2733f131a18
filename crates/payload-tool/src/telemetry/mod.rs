//! Telemetry initialisation for payload-tool.
//!
//! Structured JSON logs go to stderr: stdout is reserved for the sealed or
//! opened payload lines.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise payload-tool tracing subscriber: {e}"))
}
