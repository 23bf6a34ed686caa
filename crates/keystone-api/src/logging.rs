//! Logging initialization.
//!
//! Installs a `tracing` subscriber. Records emitted through the `log`
//! facade by the auth crates are forwarded to it.

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used as the
/// filter directive.
pub fn init(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| Error::Logging(format!("invalid log filter '{default_level}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
