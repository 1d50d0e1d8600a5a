//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug` with
/// `--verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}
