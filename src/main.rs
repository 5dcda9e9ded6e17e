use std::sync::Arc;

use clap::Parser;
use spidey::config::Cli;
use spidey::server::{ServerContext, listener};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    let ctx = Arc::new(ServerContext::from_config(&cfg)?);
    let socket = listener::bind(&cfg).await?;

    tokio::select! {
        res = listener::run(socket, ctx, &cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
