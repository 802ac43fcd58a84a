//! Tracing setup for the CLI.
//!
//! The subscriber is only installed when `INJECT_LOG` (or `RUST_LOG`) is
//! set, e.g. `INJECT_LOG=inject_graph=trace injectc model.json`. Output goes
//! to stderr next to the diagnostics.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = if let Ok(value) = std::env::var("INJECT_LOG") {
        EnvFilter::builder().parse_lossy(value)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
}
