//! Tracing setup for host applications.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber honoring `RUST_LOG`.
///
/// Defaults to `info` when `RUST_LOG` is unset. Call once at startup;
/// a second call panics (the global subscriber can only be set once).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
