//! Shared test setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a test subscriber once per test binary
///
/// Filter comes from `RUST_LOG` (default: `fishbowl=debug`). Output goes
/// through the test writer so it is only shown for failing tests.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fishbowl=debug"));

    // Another test in the same binary may have installed it already
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}
