// ABOUTME: Entry point for the docker-tidy CLI application.
// ABOUTME: Connects to the runtime once, then dispatches to the cleanup procedures.

mod cli;

use clap::Parser;
use cli::Cli;
use docker_tidy::cleanup::Cleaner;
use docker_tidy::config::RunConfig;
use docker_tidy::error::Result;
use docker_tidy::output::Reporter;
use docker_tidy::runtime::{BollardRuntime, SystemOps, resolve_endpoint};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match connect().await {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = RunConfig::new(cli.dry_run, cli.older_than, cli.show_size);
    let mut cleaner = Cleaner::new(&runtime, config, Reporter::stdout());
    let summary = cleaner.run(cli.command.target()).await;

    // Failed steps were already reported; they do not change the exit status.
    if !summary.is_clean() {
        tracing::warn!(
            failed_steps = ?summary.failed_steps(),
            failed_removals = summary.removal_failures(),
            "cleanup finished with failures"
        );
    }
}

/// Resolve the engine endpoint, build the client and make sure it answers.
async fn connect() -> Result<BollardRuntime> {
    let endpoint = resolve_endpoint()?;
    tracing::debug!(%endpoint, "connecting to container runtime");
    let runtime = BollardRuntime::connect(endpoint)?;
    runtime.ping().await?;
    Ok(runtime)
}
