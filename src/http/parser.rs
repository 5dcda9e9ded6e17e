use crate::http::request::Request;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Longest line accepted from a client, terminator included.
pub const MAX_LINE_LENGTH: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),
    #[error("request carries no headers")]
    NoHeaders,
    #[error("request line or header too long")]
    LineTooLong,
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one HTTP request head from `reader` into `request`.
///
/// The request line yields method, URI and query; the following lines up to
/// the first blank line (or end of stream) yield the headers, in arrival
/// order. On error `request` may be partially filled and must not be
/// dispatched.
pub async fn parse_request<R>(reader: &mut R, request: &mut Request) -> Result<(), ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = match read_line(reader).await? {
        Some(line) => line,
        None => return Err(ParseError::MalformedRequestLine),
    };

    let (method, uri, query) = parse_request_line(&line)?;
    tracing::debug!(method = %method, uri = %uri, query = %query, "Parsed request line");

    request.method = method;
    request.uri = uri;
    request.query = query;

    while let Some(line) = read_line(reader).await? {
        if is_blank(&line) {
            break;
        }
        let (name, value) = parse_header_line(&line)?;
        tracing::debug!(name = %name, value = %value, "Parsed header");
        request.headers.push(name, value);
    }

    if request.headers.is_empty() {
        return Err(ParseError::NoHeaders);
    }

    Ok(())
}

/// Splits `METHOD URI[?QUERY] [VERSION]` into its parts.
///
/// The version token is not inspected. A missing `?` yields an empty query.
pub fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::MalformedRequestLine)?;
    let target = parts.next().ok_or(ParseError::MalformedRequestLine)?;

    let (uri, query) = target.split_once('?').unwrap_or((target, ""));

    Ok((method.to_string(), uri.to_string(), query.to_string()))
}

/// Splits `Name: value` at the first colon, stripping leading whitespace
/// from the value and the line terminator from the end.
pub fn parse_header_line(line: &str) -> Result<(String, String), ParseError> {
    let line = chomp(line);

    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;

    Ok((name.to_string(), value.trim_start().to_string()))
}

/// Strips trailing CR/LF characters.
pub fn chomp(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

// Blank means at most one character left once the terminator is gone.
fn is_blank(line: &str) -> bool {
    chomp(line).len() <= 1
}

async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    if n == MAX_LINE_LENGTH && buf.last() != Some(&b'\n') {
        return Err(ParseError::LineTooLong);
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
