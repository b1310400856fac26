//! Tracing subscriber setup.

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_filter`, which comes from the config file
/// or `--log-level`. Output goes to stderr so `size --format json` stays
/// pipeable.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|err| eyre!("Invalid log level {default_filter:?}: {err}"))?,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|err| eyre!("Failed to install log subscriber: {err}"))
}
