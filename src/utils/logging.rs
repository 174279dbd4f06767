// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber for the binary. The library never calls this.
/// `RUST_LOG` wins when set; otherwise this crate logs at `info` and its
/// dependencies (html5ever, reqwest, ...) only at `warn`.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,filing_items=info"));

    if fmt().with_env_filter(filter).with_target(false).try_init().is_err() {
        tracing::debug!("Global subscriber already installed; keeping it");
        return;
    }

    tracing::debug!("Logging setup complete.");
}
