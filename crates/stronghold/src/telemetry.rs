//! Log output setup for binaries embedding Stronghold.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or `info` when the
/// variable is unset or invalid.
///
/// Libraries should not call this; it is for the host binary. Calling it
/// when a global subscriber is already installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }
}
