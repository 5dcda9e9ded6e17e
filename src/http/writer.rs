use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, Status};

pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Status line, headers and the separating blank line.
pub fn serialize_head(status: Status, headers: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(format!("{} {}\r\n", HTTP_VERSION, status).as_bytes());

    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");
    buf
}

pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let headers: Vec<(&str, &str)> = resp
        .headers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut buf = serialize_head(resp.status, &headers);
    buf.extend_from_slice(&resp.body);
    buf
}

/// Writes the head of a streamed response. The body follows through
/// plain writes on the same stream.
pub async fn write_head<W>(
    stream: &mut W,
    status: Status,
    headers: &[(&str, &str)],
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&serialize_head(status, headers)).await
}

/// Writes a fully buffered response and flushes it.
pub async fn write_response<W>(stream: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&serialize_response(response)).await?;
    stream.flush().await
}
