//! Tracing setup: structured JSON logs to stdout.
//!
//! # Telemetry invariants
//!
//! - **No lookup keys, raw primary keys of rejected input, or key material**
//!   appear in any log field. Tokens are logged only by type.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridable
//!   with `RUST_LOG`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
