use tokio::net::TcpListener;

use crate::http::connection::Connection;
use crate::server::context::ServerContext;

/// Serves one connection at a time: accept, handle, release, repeat.
/// Accept failures are logged and retried immediately.
pub async fn serve(listener: &TcpListener, ctx: &ServerContext) {
    loop {
        let mut conn = match Connection::accept(listener).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Unable to accept request");
                continue;
            }
        };

        conn.run(ctx).await;
        conn.release().await;
    }
}
