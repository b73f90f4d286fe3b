use anyhow::Result;
use clap::Parser;
use cognalyze::cli::{Cli, Commands};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Analyze(args) => cognalyze::commands::analyze_file(args).await,
        Commands::Watch {
            args,
            poll_interval_ms,
        } => cognalyze::commands::watch_file(args, Duration::from_millis(poll_interval_ms)).await,
        Commands::Init { force } => cognalyze::commands::init_config(force),
    }
}

/// RUST_LOG wins over -v.
fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
