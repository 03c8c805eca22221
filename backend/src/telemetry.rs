//! Tracing bootstrap for binaries embedding the contact core.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the JSON tracing subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; a second initialisation is reported at
/// `warn` level and otherwise ignored.
pub fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
