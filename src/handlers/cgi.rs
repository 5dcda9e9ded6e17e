//! CGI bridge.
//!
//! The script's standard output is relayed to the client untouched and is
//! the whole response: no status line or header is added, the script has
//! to produce them itself.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::handlers::error::handle_error;
use crate::http::request::Request;
use crate::http::response::Status;
use crate::server::context::ServerContext;

/// Request headers exported to the script, with their variable names.
pub const EXPORTED_HEADERS: &[(&str, &str)] = &[
    ("Host", "HTTP_HOST"),
    ("Accept", "HTTP_ACCEPT"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Connection", "HTTP_CONNECTION"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

/// Builds the CGI environment for `request` targeting `script`.
///
/// Values that cannot be handed to a process (embedded NUL) are dropped
/// with a warning.
pub fn cgi_environment(script: &Path, request: &Request, ctx: &ServerContext) -> Vec<(String, String)> {
    let mut vars = vec![
        ("QUERY_STRING", request.query.clone()),
        ("REMOTE_ADDR", request.client_host.clone()),
        ("REMOTE_PORT", request.client_port.clone()),
        ("REQUEST_METHOD", request.method.clone()),
        ("REQUEST_URI", request.uri.clone()),
        ("SCRIPT_FILENAME", script.display().to_string()),
        ("DOCUMENT_ROOT", ctx.root.display().to_string()),
        ("SERVER_PORT", ctx.port.to_string()),
    ];

    for &(header, var) in EXPORTED_HEADERS {
        if let Some(value) = request.header(header) {
            vars.push((var, value.to_string()));
        }
    }

    vars.into_iter()
        .filter_map(|(name, value)| {
            if value.contains('\0') {
                tracing::warn!(var = name, "Can't export CGI variable: value contains NUL");
                None
            } else {
                Some((name.to_string(), value))
            }
        })
        .collect()
}

/// Runs `script` through the shell and relays its output line by line.
pub async fn handle_cgi<W>(stream: &mut W, script: &Path, request: &Request, ctx: &ServerContext) -> Status
where
    W: AsyncWrite + Unpin,
{
    let mut command = Command::new("/bin/sh");
    command
        .arg("-c")
        .arg(shell_quote(&script.display().to_string()))
        .envs(cgi_environment(script, request, ctx))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(script = %script.display(), error = %e, "Failed to spawn CGI script");
            return handle_error(stream, Status::InternalServerError).await;
        }
    };

    let Some(stdout) = child.stdout.take() else {
        tracing::warn!(script = %script.display(), "CGI script has no stdout");
        if let Err(e) = child.kill().await {
            tracing::debug!(error = %e, "CGI script already exited");
        }
        return handle_error(stream, Status::InternalServerError).await;
    };

    let mut status = Status::Ok;
    let mut output = BufReader::new(stdout);
    let mut line = Vec::new();
    loop {
        line.clear();
        match output.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(script = %script.display(), error = %e, "Failed to read CGI output");
                status = Status::InternalServerError;
                break;
            }
        }

        if let Err(e) = stream.write_all(&line).await {
            tracing::warn!(script = %script.display(), error = %e, "Failed to relay CGI output");
            status = Status::InternalServerError;
            break;
        }
    }

    if status.is_success() {
        if let Err(e) = stream.flush().await {
            tracing::warn!(error = %e, "flush failed");
            status = Status::InternalServerError;
        }
    } else if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "CGI script already exited");
    }

    match child.wait().await {
        Ok(exit) => tracing::debug!(script = %script.display(), %exit, "CGI script finished"),
        Err(e) => tracing::warn!(script = %script.display(), error = %e, "Failed to reap CGI script"),
    }

    status
}

/// Wraps `word` in single quotes so the shell runs it as one path.
pub fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}
