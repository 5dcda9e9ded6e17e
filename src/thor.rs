//! Load generator used to benchmark a running server.
//!
//! A *hammer* is a task that makes a number of sequential *throws*
//! (HTTP/1.0 `GET` requests, response read until close). Hammers run
//! concurrently.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::request::RequestBuilder;

const BUFFER_SIZE: usize = 8192;

/// Where the throws go, taken apart from an `http://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub uri: String,
    pub query: String,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = url::Url::parse(raw).with_context(|| format!("invalid URL {raw:?}"))?;

        if url.scheme() != "http" {
            anyhow::bail!("unsupported scheme {:?}", url.scheme());
        }

        let host = url.host_str().context("URL missing host")?.to_string();
        let port = url.port().unwrap_or(80);

        Ok(Self {
            host,
            port,
            uri: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The request head sent by every throw.
    pub fn request_head(&self) -> String {
        let host = if self.port == 80 {
            self.host.clone()
        } else {
            self.addr()
        };

        RequestBuilder::new()
            .method("GET")
            .uri(self.uri.as_str())
            .query(self.query.as_str())
            .header("Host", host)
            .header("User-Agent", "thor")
            .header("Connection", "close")
            .build()
            .map(|req| req.to_wire())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Throw {
    pub elapsed: Duration,
    /// Raw response, status line and headers included
    pub response: Vec<u8>,
}

impl Throw {
    /// Response bytes after the blank line that ends the head.
    pub fn body(&self) -> &[u8] {
        self.response
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|end| &self.response[end + 4..])
            .unwrap_or(&self.response)
    }

    /// The status line, when the response carried one.
    pub fn status_line(&self) -> Option<&str> {
        let end = self.response.windows(2).position(|w| w == b"\r\n")?;
        std::str::from_utf8(&self.response[..end]).ok()
    }
}

#[derive(Debug, Clone)]
pub struct HammerReport {
    pub id: usize,
    pub throws: Vec<Throw>,
}

impl HammerReport {
    pub fn average(&self) -> Duration {
        average(self.throws.iter().map(|t| t.elapsed))
    }
}

/// Makes one request and reads the response until the server closes.
pub async fn throw(target: &Target) -> Result<Throw> {
    let started = Instant::now();

    let mut stream = TcpStream::connect(target.addr())
        .await
        .with_context(|| format!("failed to connect to {}", target.addr()))?;

    stream.write_all(target.request_head().as_bytes()).await?;
    stream.flush().await?;

    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            break;
        }
        if buffer.capacity() == buffer.len() {
            buffer.reserve(BUFFER_SIZE);
        }
    }

    Ok(Throw {
        elapsed: started.elapsed(),
        response: buffer.to_vec(),
    })
}

/// Makes `throws` sequential requests.
pub async fn hammer(target: &Target, id: usize, throws: usize) -> Result<HammerReport> {
    let mut report = HammerReport {
        id,
        throws: Vec::with_capacity(throws),
    };

    for _ in 0..throws {
        report.throws.push(throw(target).await?);
    }

    Ok(report)
}

/// Runs `hammers` concurrent hammers and collects their reports in id order.
pub async fn run(target: Target, hammers: usize, throws: usize) -> Result<Vec<HammerReport>> {
    let target = Arc::new(target);

    let handles: Vec<_> = (0..hammers)
        .map(|id| {
            let target = Arc::clone(&target);
            tokio::spawn(async move { hammer(&target, id, throws).await })
        })
        .collect();

    let mut reports = Vec::with_capacity(hammers);
    for handle in handles {
        reports.push(handle.await.context("hammer task failed")??);
    }

    Ok(reports)
}

pub fn average(durations: impl Iterator<Item = Duration>) -> Duration {
    let (total, count) = durations.fold((Duration::ZERO, 0u32), |(sum, n), d| (sum + d, n + 1));
    if count == 0 {
        Duration::ZERO
    } else {
        total / count
    }
}
