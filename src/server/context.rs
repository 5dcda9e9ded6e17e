use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::handlers::Credentials;
use crate::http::mime::MimeTypes;

/// Read-only state shared by every connection for the life of the process.
#[derive(Debug, Clone)]
pub struct ServerContext {
    /// Canonical document root, used for every root-jail comparison
    pub root: PathBuf,
    /// Listening port, exported to CGI scripts
    pub port: u16,
    pub mime_types: MimeTypes,
    /// Identity checked against file permissions when dispatching
    pub credentials: Credentials,
}

impl ServerContext {
    pub fn new(root: &Path, port: u16, mime_types: MimeTypes) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("document root {} is not accessible", root.display()))?;

        Ok(Self {
            root,
            port,
            mime_types,
            credentials: Credentials::current(),
        })
    }

    /// Canonicalizes the document root and loads the mime database. A
    /// missing database only costs content-type precision.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let mime_types = match MimeTypes::load(&cfg.mime_types, cfg.default_mime_type.as_str()) {
            Ok(table) => {
                tracing::debug!(entries = table.len(), path = %cfg.mime_types.display(), "Loaded mime database");
                table
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Serving every file as {}", cfg.default_mime_type);
                MimeTypes::empty(cfg.default_mime_type.as_str())
            }
        };

        Self::new(&cfg.root, cfg.port, mime_types)
    }
}
