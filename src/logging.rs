//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` or `info`.
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(debug: bool) -> bool {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
