//! Opt-in tracing setup for hosts embedding the cipher.
//!
//! The library itself only emits events. Hosts that have no subscriber of
//! their own can call [`init`] once at startup to get structured JSON logs.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise a global JSON tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` is used as the filter.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive or a
/// global subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| anyhow::anyhow!("invalid log level {log_level:?}: {e}"))?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise valuecrypt tracing subscriber: {e}"))
}
