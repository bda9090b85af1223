//! Caliper binary.

use std::error::Error as _;
use std::process::ExitCode;

use caliper::{Cli, render_summary};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("caliper=info,warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Cli::parse().into_config();

    tracing::info!(
        "Starting Caliper v{} against '{}'",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    match caliper::run(&config).await {
        Ok(summary) => {
            println!("{}", render_summary(&summary));
            if summary.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
