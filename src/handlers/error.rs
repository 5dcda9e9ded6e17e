use tokio::io::AsyncWrite;

use crate::http::response::{ResponseBuilder, Status};
use crate::http::writer::write_response;

/// Writes the error page for `status` and hands `status` back so callers
/// can return it as the outcome of the request. Write failures are only
/// logged: the client is already gone.
pub async fn handle_error<W>(stream: &mut W, status: Status) -> Status
where
    W: AsyncWrite + Unpin,
{
    tracing::debug!(status = status.as_u16(), "Writing error page");

    let response = ResponseBuilder::new(status)
        .header("Content-Type", "text/html")
        .body(error_page(status).into_bytes())
        .build();

    if let Err(e) = write_response(stream, &response).await {
        tracing::debug!(error = %e, "Failed to write error page");
    }

    status
}

pub fn error_page(status: Status) -> String {
    format!(
        "<html><head><title>{status}</title></head><body>\n\
         <h1>{code}</h1>\n\
         <p>{reason}</p>\n\
         </body></html>\n",
        status = status,
        code = status.as_u16(),
        reason = describe(status),
    )
}

fn describe(status: Status) -> &'static str {
    match status {
        Status::BadRequest => "The request could not be understood.",
        Status::NotFound => "The page you requested was not found.",
        Status::InternalServerError => "The server failed to complete the request.",
        Status::Ok | Status::Unknown(_) => "Something unexpected happened.",
    }
}
