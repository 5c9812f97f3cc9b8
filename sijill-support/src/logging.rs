//! Tracing subscriber setup for binaries and demos.
//!
//! Library code only emits `tracing` events; installing a subscriber
//! is left to the application.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back
/// to `default_filter` when the variable is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
///
/// ```
/// use sijill_support::logging::init_tracing;
///
/// init_tracing("sijill=debug");
/// // a second call is harmless
/// assert!(!init_tracing("sijill=trace"));
/// ```
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
