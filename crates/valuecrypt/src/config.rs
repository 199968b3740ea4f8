//! Configuration loading and validation for the value cipher.
//!
//! Values are read from `VALUECRYPT_`-prefixed environment variables.
//! Every field has a default, so an empty environment is a valid setup.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Prefix shared by every environment variable this crate reads.
pub const ENV_PREFIX: &str = "VALUECRYPT";

/// Validated cipher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reuse the nonce of an unchanged (value, associated data) pair so
    /// re-encrypted documents stay diff-minimal. Disable to force fresh
    /// nonces on every encryption.
    #[serde(default = "default_stash_nonces")]
    pub stash_nonces: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_stash_nonces() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stash_nonces: default_stash_nonces(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration from environment")?;

        Self::from_source(cfg)
    }

    fn from_source(cfg: config::Config) -> Result<Self> {
        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("{ENV_PREFIX}_LOG_LEVEL must not be empty");
        }
        EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("{ENV_PREFIX}_LOG_LEVEL is not a valid filter directive"))?;
        Ok(())
    }
}
