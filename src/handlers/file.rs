use bytes::BytesMut;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::handlers::error::handle_error;
use crate::http::mime::MimeTypes;
use crate::http::response::Status;
use crate::http::writer::write_head;

/// Size of each chunk copied from the file to the client
pub const CHUNK_SIZE: usize = 8192;

/// Streams the file at `path` with a content type from `mime_types`.
///
/// The `200 OK` head is committed before the first body byte, so a write
/// failure halfway through only truncates the body; it is reported as
/// `InternalServerError` to the caller, not to the client.
pub async fn handle_file<W>(stream: &mut W, path: &Path, mime_types: &MimeTypes) -> Status
where
    W: AsyncWrite + Unpin,
{
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "open failed");
            return handle_error(stream, Status::NotFound).await;
        }
    };

    let mimetype = mime_types.lookup(path);
    tracing::debug!(path = %path.display(), mimetype, "Streaming file");

    if let Err(e) = write_head(stream, Status::Ok, &[("Content-Type", mimetype)]).await {
        tracing::warn!(error = %e, "Failed to write response head");
        return Status::InternalServerError;
    }

    let mut buffer = BytesMut::with_capacity(CHUNK_SIZE);
    loop {
        buffer.clear();
        let n = match file.read_buf(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "read failed mid-stream");
                return Status::InternalServerError;
            }
        };

        if let Err(e) = stream.write_all(&buffer[..n]).await {
            tracing::warn!(path = %path.display(), error = %e, "write failed mid-stream");
            return Status::InternalServerError;
        }
    }

    if let Err(e) = stream.flush().await {
        tracing::warn!(error = %e, "flush failed");
        return Status::InternalServerError;
    }

    Status::Ok
}
