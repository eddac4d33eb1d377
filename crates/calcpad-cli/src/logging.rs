//! Log subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` takes precedence over the `-v`/`-q` flags. Set
/// `CALCPAD_LOG_FORMAT=json` for one JSON object per event. Calling this
/// twice is harmless; the first subscriber stays.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let json = std::env::var("CALCPAD_LOG_FORMAT").is_ok_and(|format| format == "json");
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::trace!("log subscriber already installed");
    }
}
