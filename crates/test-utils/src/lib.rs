//! Shared helpers for trigseq's integration tests.

pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Filter directives come from `TRIGSEQ_LOG` (the same variable the binary
/// reads), defaulting to `info`. Output only shows for failing tests unless
/// run with `-- --nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TRIGSEQ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `fut`, failing the test if it takes longer than `limit`.
///
/// Under `start_paused` the limit is measured on the paused clock.
pub async fn with_timeout<F>(limit: Duration, fut: F) -> F::Output
where
    F: Future,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test future did not finish within {limit:?}"),
    }
}
