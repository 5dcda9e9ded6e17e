use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

/// How accepted connections are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// One request at a time, processed by the acceptor itself
    Single,
    /// One independent worker per accepted connection
    Forking,
}

/// What the worker-per-connection driver does when no worker can be
/// started for a freshly accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpawnFailurePolicy {
    /// Stop the whole server
    Exit,
    /// Drop that connection and keep accepting
    Continue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    pub mime_types: PathBuf,
    pub default_mime_type: String,
    pub concurrency: ConcurrencyMode,
    pub max_workers: usize,
    pub on_spawn_failure: SpawnFailurePolicy,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9898,
            root: PathBuf::from("www"),
            mime_types: PathBuf::from("/etc/mime.types"),
            default_mime_type: "text/plain".to_string(),
            concurrency: ConcurrencyMode::Single,
            max_workers: 1024,
            on_spawn_failure: SpawnFailurePolicy::Exit,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("invalid configuration")
    }

    /// Rejects values the drivers cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_workers == 0 || self.max_workers > Semaphore::MAX_PERMITS {
            anyhow::bail!(
                "max_workers must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_workers
            );
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("in {}", path.display()))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Command line of the `spidey` binary. Every flag overrides the value
/// coming from the optional YAML file.
#[derive(Debug, Parser)]
#[command(name = "spidey")]
#[command(about = "Minimal HTTP/1.0 server for static files, directory listings and CGI scripts")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, env = "SPIDEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Concurrency mode
    #[arg(short = 'c', long, value_enum, env = "SPIDEY_CONCURRENCY")]
    pub concurrency: Option<ConcurrencyMode>,

    /// Path to the mime database
    #[arg(short = 'm', long = "mimetypes", env = "SPIDEY_MIME_TYPES")]
    pub mime_types: Option<PathBuf>,

    /// Content type used when no extension matches
    #[arg(short = 'M', long = "default-mimetype")]
    pub default_mime_type: Option<String>,

    /// Address to bind
    #[arg(long, env = "SPIDEY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, env = "SPIDEY_PORT")]
    pub port: Option<u16>,

    /// Document root
    #[arg(short = 'r', long, env = "SPIDEY_ROOT")]
    pub root: Option<PathBuf>,

    /// Capacity of the worker-per-connection driver
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Behaviour when a worker cannot be started
    #[arg(long, value_enum)]
    pub on_spawn_failure: Option<SpawnFailurePolicy>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Layers the flags over the config file (or the defaults), then
    /// validates the result.
    pub fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(v) = self.concurrency {
            cfg.concurrency = v;
        }
        if let Some(v) = self.mime_types {
            cfg.mime_types = v;
        }
        if let Some(v) = self.default_mime_type {
            cfg.default_mime_type = v;
        }
        if let Some(v) = self.host {
            cfg.host = v;
        }
        if let Some(v) = self.port {
            cfg.port = v;
        }
        if let Some(v) = self.root {
            cfg.root = v;
        }
        if let Some(v) = self.max_workers {
            cfg.max_workers = v;
        }
        if let Some(v) = self.on_spawn_failure {
            cfg.on_spawn_failure = v;
        }
        if let Some(v) = self.log_level {
            cfg.log_level = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
