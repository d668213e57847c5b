pub mod builders;
pub mod fake_coordinator;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

pub use builders::{JobBuilder, WorkerConfigBuilder};
pub use fake_coordinator::FakeCoordinator;

static INIT: Once = Once::new();

/// Worker logs at debug, driver and HTTP internals only when they warn.
const DEFAULT_TEST_FILTER: &str = "location_worker=debug,sqlx=warn,reqwest=warn,hyper=warn";

/// Initialise tracing for tests, once per test binary.
///
/// Output goes through `with_test_writer()`, so the harness only shows it
/// for failing tests. `RUST_LOG` replaces the default filter.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Upper bound for any single test future.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a future, panicking if it outlives [`TEST_TIMEOUT`].
///
/// Under `start_paused` the bound is in virtual time.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test future did not finish within {TEST_TIMEOUT:?}"),
    }
}
