//! `encrypted-lookup-server`: demo HTTP host for the encrypted-lookup fields.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Build the lookup cipher from `LOOKUP_KEY` and install it in a
//!    [`LookupContext`].
//! 4. Build the Axum router and serve.

mod config;
mod routes;
mod serializers;
mod server;
mod store;
mod telemetry;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use lookup::{AeadLookupCipher, LookupContext};
use tracing::info;

use crate::config::Config;
use crate::server::state::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "encrypted-lookup-server starting"
    );

    // -----------------------------------------------------------------------
    // 3. Lookup cipher
    // -----------------------------------------------------------------------
    let cipher = AeadLookupCipher::new(cfg.lookup_key()?)
        .context("failed to initialise lookup cipher")?;
    let lookup = LookupContext::with_cipher(Arc::new(cipher));
    info!("lookup cipher installed");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(lookup, Store::new(), cfg.url_scheme.clone());
    let router = server::router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}
