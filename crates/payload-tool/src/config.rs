//! Configuration loading and validation for payload-tool.
//!
//! All values are read from environment variables at startup. The process
//! exits with a clear error message if any value is invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated payload-tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded pre-shared key, 16 or 32 bytes once decoded. Empty selects
    /// the built-in development key.
    #[serde(default)]
    pub payload_key: String,

    /// ChaCha round count: 8, 12, or 20.
    #[serde(default = "default_rounds")]
    pub rounds: u8,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rounds() -> u8 {
    20
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
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

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if !matches!(self.rounds, 8 | 12 | 20) {
            anyhow::bail!("ROUNDS must be 8, 12, or 20 (got {})", self.rounds);
        }
        self.key_bytes()?;
        Ok(())
    }

    /// Decoded key bytes, or `None` when no custom key was supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if `PAYLOAD_KEY` is not hex or decodes to a length
    /// other than 16 or 32 bytes.
    pub fn key_bytes(&self) -> Result<Option<Vec<u8>>> {
        if self.payload_key.is_empty() {
            return Ok(None);
        }
        let key = hex::decode(&self.payload_key).context("PAYLOAD_KEY is not valid hex")?;
        if key.len() != 16 && key.len() != 32 {
            anyhow::bail!(
                "PAYLOAD_KEY must decode to 16 or 32 bytes (got {})",
                key.len()
            );
        }
        Ok(Some(key))
    }
}
