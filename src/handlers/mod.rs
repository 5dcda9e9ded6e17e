//! Response strategies and the dispatcher that picks one.
//!
//! The dispatcher looks at the metadata of the resolved path exactly once
//! and turns it into a [`Handler`]:
//!
//! | target                              | handler                 |
//! |-------------------------------------|-------------------------|
//! | stat fails                          | `Error(NotFound)`       |
//! | directory                           | `Browse`                |
//! | regular file, we may execute it     | `Cgi`                   |
//! | regular file, we may only read it   | `File`                  |
//! | anything else                       | `Error(BadRequest)`     |
//!
//! Execute permission wins over read permission. "We" is the identity in
//! [`Credentials`], normally the server's effective user and groups.

pub mod access;
pub mod browse;
pub mod cgi;
pub mod error;
pub mod file;

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;

use tokio::io::AsyncWrite;

pub use access::Credentials;

use crate::http::request::Request;
use crate::http::response::Status;
use crate::server::context::ServerContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// HTML listing of a directory
    Browse(PathBuf),
    /// Static file streamed verbatim
    File(PathBuf),
    /// Executable relayed as a CGI program
    Cgi(PathBuf),
    /// Fixed error page
    Error(Status),
}

impl Handler {
    pub fn name(&self) -> &'static str {
        match self {
            Handler::Browse(_) => "browse",
            Handler::File(_) => "file",
            Handler::Cgi(_) => "cgi",
            Handler::Error(_) => "error",
        }
    }

    /// Runs the strategy against `stream` and returns the outcome of the
    /// request.
    pub async fn respond<W>(self, stream: &mut W, request: &Request, ctx: &ServerContext) -> Status
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            Handler::Browse(path) => browse::handle_browse(stream, &path, &request.uri).await,
            Handler::File(path) => file::handle_file(stream, &path, &ctx.mime_types).await,
            Handler::Cgi(path) => cgi::handle_cgi(stream, &path, request, ctx).await,
            Handler::Error(status) => error::handle_error(stream, status).await,
        }
    }
}

/// Stats `path` and classifies it.
pub async fn classify(path: PathBuf, credentials: &Credentials) -> Handler {
    match tokio::fs::metadata(&path).await {
        Ok(meta) => classify_metadata(path, &meta, credentials),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "stat failed");
            Handler::Error(Status::NotFound)
        }
    }
}

pub fn classify_metadata(path: PathBuf, meta: &Metadata, credentials: &Credentials) -> Handler {
    if meta.is_dir() {
        return Handler::Browse(path);
    }

    if !meta.is_file() {
        tracing::debug!(path = %path.display(), "not a regular file or directory");
        return Handler::Error(Status::BadRequest);
    }

    if credentials.can_execute(meta) {
        Handler::Cgi(path)
    } else if credentials.can_read(meta) {
        Handler::File(path)
    } else {
        tracing::debug!(
            path = %path.display(),
            mode = %format!("{:o}", meta.mode() & 0o7777),
            owner = meta.uid(),
            uid = credentials.uid,
            "insufficient permissions"
        );
        Handler::Error(Status::BadRequest)
    }
}
