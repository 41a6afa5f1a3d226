use anyhow::Result;
use clap::Parser;
use sshburst::{Config, SshLogin, cli::Args, fleet};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse args
    let args = Args::parse();

    // Initialize tracing subscriber
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Results go to stdout, diagnostics to stderr
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Every configuration error surfaces here, before any attempt
    let config = Config::from_args(args).await?;

    let login = Arc::new(SshLogin::new(Arc::new(config.dialer), config.detail));

    let summary = fleet::run(
        config.targets,
        config.wordlists,
        login,
        config.budget,
        config.max_hosts,
    )
    .await;

    for endpoint in summary.cracked() {
        info!("valid credentials found on {}", endpoint);
    }

    Ok(())
}
