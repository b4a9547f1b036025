//! Subscriber setup for binaries, tests and benches.
//!
//! Library crates only emit `tracing` events; installing a subscriber is left
//! to whoever owns `main`.

use tracing_subscriber::EnvFilter;

/// Default filter: engine crates at `debug`, everything else at `info`.
pub const DEFAULT_FILTER: &str = "info,astrelis_core=debug,astrelis_dock=debug";

/// Install a fmt subscriber honouring `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // Already installed when several tests share the process.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install a fmt subscriber with an explicit filter directive.
pub fn init_with_filter(directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_test_writer()
        .try_init();
}
