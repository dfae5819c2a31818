use clap::Parser;
use taskdeck::cli::commands::Cli;
use taskdeck::cli::handlers;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TASKDECK_LOG").unwrap_or_else(|_| EnvFilter::new("taskdeck=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
