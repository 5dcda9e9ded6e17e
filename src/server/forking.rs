use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::config::SpawnFailurePolicy;
use crate::http::connection::Connection;
use crate::server::context::ServerContext;

#[derive(Debug, Clone, Copy)]
pub struct WorkerLimits {
    /// Workers allowed to run at once
    pub max_workers: usize,
    /// What to do with a connection that finds every worker slot taken
    pub on_spawn_failure: SpawnFailurePolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("unable to start a worker: all {max_workers} workers busy")]
    WorkerSpawn { max_workers: usize },
}

/// Worker-per-connection driver.
///
/// Each accepted connection is moved into its own task; the acceptor keeps
/// no handle to it and goes straight back to `accept`. Workers share only
/// the read-only context. A worker releases its connection and ends; a
/// panicking worker takes down nothing but itself.
///
/// When no worker slot is free the connection is released and, under
/// `SpawnFailurePolicy::Exit`, the driver stops with
/// `ServeError::WorkerSpawn`. Under `Continue` it keeps accepting.
pub async fn serve(
    listener: &TcpListener,
    ctx: Arc<ServerContext>,
    limits: WorkerLimits,
) -> Result<(), ServeError> {
    let workers = Arc::new(Semaphore::new(limits.max_workers));

    loop {
        let mut conn = match Connection::accept(listener).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Unable to accept request");
                continue;
            }
        };

        let permit = match Arc::clone(&workers).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                conn.release().await;
                match limits.on_spawn_failure {
                    SpawnFailurePolicy::Exit => {
                        tracing::error!(max_workers = limits.max_workers, "Worker spawn failed, shutting down");
                        return Err(ServeError::WorkerSpawn {
                            max_workers: limits.max_workers,
                        });
                    }
                    SpawnFailurePolicy::Continue => {
                        tracing::warn!(max_workers = limits.max_workers, "Worker spawn failed, dropping connection");
                        continue;
                    }
                }
            }
        };

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let _permit = permit;
            conn.run(&ctx).await;
            conn.release().await;
        });
    }
}
