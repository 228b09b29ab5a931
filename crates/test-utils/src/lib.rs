//! Shared helpers for the flw integration tests.

pub mod builders;
pub mod recording_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single flow under test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `FLW_LOG`, then `RUST_LOG`, then `info`. Output is
/// captured and only shown for failing tests (or with `--nocapture`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FLW_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
///
/// A flow that never completes shows up as a failed test instead of a hang.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("flow did not complete within {TEST_TIMEOUT:?}"),
    }
}
