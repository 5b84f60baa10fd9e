//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::{LoggingConfig, RuntimeError, RuntimeResult};

/// Install the global tracing subscriber.
///
/// RUST_LOG takes precedence over the configured filter. Calling this
/// again after a subscriber is installed is not an error.
pub fn init_logging(config: &LoggingConfig) -> RuntimeResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| RuntimeError::Logging(e.to_string()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "subscriber already installed");
    }
    Ok(())
}
