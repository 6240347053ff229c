//! Logging setup for the command-line front end.
//!
//! Events go to stdout, so diagnostics are written to stderr. Set
//! `DEBUG_LOGGING=1` for debug output from the wakmeter crates; `RUST_LOG`
//! takes precedence over both.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let filter_directive = if debug_logging {
        "info,wakmeter=debug,wakmeter_core=debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(debug_logging, "Logging initialized");
}
