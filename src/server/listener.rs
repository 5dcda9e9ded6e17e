use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Config, ConcurrencyMode};
use crate::server::context::ServerContext;
use crate::server::forking::{self, WorkerLimits};
use crate::server::single;

pub async fn bind(cfg: &Config) -> anyhow::Result<TcpListener> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("unable to bind {}", addr))?;
    info!("Listening on {}", addr);
    Ok(listener)
}

/// Runs the driver selected by `cfg.concurrency` over `listener`.
pub async fn run(listener: TcpListener, ctx: Arc<ServerContext>, cfg: &Config) -> anyhow::Result<()> {
    info!(
        root = %ctx.root.display(),
        mode = ?cfg.concurrency,
        "Serving"
    );

    match cfg.concurrency {
        ConcurrencyMode::Single => single::serve(&listener, &ctx).await,
        ConcurrencyMode::Forking => {
            let limits = WorkerLimits {
                max_workers: cfg.max_workers,
                on_spawn_failure: cfg.on_spawn_failure,
            };
            forking::serve(&listener, ctx, limits).await?;
        }
    }

    Ok(())
}
