//! Configuration loading and validation for the demo server.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use lookup::LookupKey;
use serde::Deserialize;

/// Validated server configuration.
///
/// Not `Debug`: `lookup_key` is secret.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64-encoded 32-byte key for the lookup cipher. **Required.**
    pub lookup_key: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Scheme used when building absolute hyperlinks (`http` or `https`).
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_url_scheme() -> String {
    "http".into()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured lookup key.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOOKUP_KEY` is not base64 of exactly 32 bytes.
    pub fn lookup_key(&self) -> Result<LookupKey> {
        LookupKey::from_base64(&self.lookup_key).context("LOOKUP_KEY is invalid")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.lookup_key.trim().is_empty() {
            anyhow::bail!("LOOKUP_KEY is required and must not be empty");
        }
        self.lookup_key()?;

        if !matches!(self.url_scheme.as_str(), "http" | "https") {
            anyhow::bail!("URL_SCHEME must be `http` or `https`");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}
