// ABOUTME: Test support utilities.
// ABOUTME: Provides the in-memory runtime and report capture for integration tests.

use docker_tidy::cleanup::{Cleaner, CleanupSummary, Target};
use docker_tidy::config::RunConfig;
use docker_tidy::output::Reporter;
use std::sync::Once;

// Each test binary only uses some of these helpers, so allow dead_code.
#[allow(dead_code)]
pub mod fake_runtime;

pub use fake_runtime::FakeRuntime;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("docker_tidy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Run one target against the fake and capture the plain-text report.
#[allow(dead_code)]
pub async fn run_cleanup(
    runtime: &FakeRuntime,
    config: RunConfig,
    target: Target,
) -> (CleanupSummary, String) {
    init_tracing();
    let mut cleaner = Cleaner::new(runtime, config, Reporter::new(Vec::new()));
    let summary = cleaner.run(target).await;
    let output = String::from_utf8(cleaner.into_reporter().into_inner()).unwrap();
    (summary, output)
}

/// The leading identifier of every ` - ` item line in a report.
#[allow(dead_code)]
pub fn listed_items(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix(" - "))
        .filter_map(|item| item.split([' ', ':']).next())
        .map(str::to_string)
        .collect()
}
