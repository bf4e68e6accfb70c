//! Logging setup for the `flakeid` binary.
//!
//! Ids go to stdout, so every log line is written to stderr. Filtering comes
//! from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing` subscriber.
pub fn init_tracing() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
