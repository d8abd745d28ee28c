//! Subscriber installation for the crate's `tracing` output.
//!
//! The runtime only emits events; installing a subscriber is the host's
//! choice. [`init`] wires a `fmt` subscriber filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global `fmt` subscriber.
///
/// Returns `false` if a global subscriber was already set (for example by a
/// test harness); that is not treated as an error.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install a global `fmt` subscriber, ignoring a previously installed one.
pub fn init() {
    if !try_init() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Install a subscriber that writes through the test harness's capture.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}
