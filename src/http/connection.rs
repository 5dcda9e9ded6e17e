use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::handlers::{self, Handler};
use crate::http::parser::parse_request;
use crate::http::path::resolve;
use crate::http::request::Request;
use crate::http::response::Status;
use crate::server::context::ServerContext;

#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    #[error("unable to accept client: {0}")]
    Accept(#[source] std::io::Error),
    #[error("unable to look up client address: {0}")]
    PeerLookup(#[source] std::io::Error),
}

/// Owns one client from accept to release: the stream, the request parsed
/// from it and the progress through the pipeline.
pub struct Connection<S = TcpStream> {
    stream: Option<BufReader<S>>,
    request: Request,
    state: ConnectionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Reading,
    Resolving,
    Dispatching,
    Responding(Handler),
    Closed(Status),
    Released,
}

impl Connection<TcpStream> {
    /// Waits for the next client on `listener` and records its numeric
    /// address and port.
    pub async fn accept(listener: &TcpListener) -> Result<Self, AcceptError> {
        let (socket, _) = listener.accept().await.map_err(AcceptError::Accept)?;
        let peer = socket.peer_addr().map_err(AcceptError::PeerLookup)?;

        tracing::info!(peer = %peer, "Accepted connection");
        Ok(Self::new(socket, peer))
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr) -> Self {
        let request = Request {
            client_host: peer.ip().to_string(),
            client_port: peer.port().to_string(),
            ..Request::default()
        };

        Self {
            stream: Some(BufReader::new(stream)),
            request,
            state: ConnectionState::Reading,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Drives the request through parse, resolve, dispatch and respond,
    /// returning the overall status. Every failure ends in an error page;
    /// nothing here is fatal to the server.
    pub async fn run(&mut self, ctx: &ServerContext) -> Status {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Released);

            self.state = match state {
                ConnectionState::Reading => {
                    let Some(stream) = self.stream.as_mut() else {
                        return Status::InternalServerError;
                    };
                    match parse_request(stream, &mut self.request).await {
                        Ok(()) => ConnectionState::Resolving,
                        Err(e) => {
                            tracing::warn!(peer = %self.peer(), error = %e, "Failed to parse request");
                            ConnectionState::Responding(Handler::Error(Status::BadRequest))
                        }
                    }
                }

                ConnectionState::Resolving => match resolve(&ctx.root, &self.request.uri).await {
                    Ok(path) => {
                        tracing::debug!(path = %path.display(), "Resolved request path");
                        self.request.path = Some(path);
                        ConnectionState::Dispatching
                    }
                    Err(e) => {
                        tracing::warn!(uri = %self.request.uri, error = %e, "Failed to resolve request path");
                        ConnectionState::Responding(Handler::Error(Status::NotFound))
                    }
                },

                ConnectionState::Dispatching => match self.request.path.clone() {
                    Some(path) => ConnectionState::Responding(handlers::classify(path, &ctx.credentials).await),
                    None => ConnectionState::Responding(Handler::Error(Status::NotFound)),
                },

                ConnectionState::Responding(handler) => {
                    let Some(stream) = self.stream.as_mut() else {
                        return Status::InternalServerError;
                    };
                    tracing::debug!(handler = handler.name(), "Dispatching request");
                    let status = handler.respond(stream, &self.request, ctx).await;
                    tracing::info!(
                        peer = %self.peer(),
                        method = %self.request.method,
                        uri = %self.request.uri,
                        status = status.as_u16(),
                        "Handled request"
                    );
                    ConnectionState::Closed(status)
                }

                ConnectionState::Closed(status) => {
                    self.state = ConnectionState::Closed(status);
                    return status;
                }

                ConnectionState::Released => {
                    self.state = ConnectionState::Released;
                    return Status::InternalServerError;
                }
            };
        }
    }

    /// Closes the stream if it is still open and drops the request data.
    /// Safe to call more than once and at any point of the pipeline.
    pub async fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(error = %e, "shutdown failed");
            }
        }
        self.request.clear();
        self.state = ConnectionState::Released;
    }

    fn peer(&self) -> String {
        format!("{}:{}", self.request.client_host, self.request.client_port)
    }
}
