//! HTTP/1.0 protocol implementation.
//!
//! One request per connection, no keep-alive, no request bodies.
//!
//! # Architecture
//!
//! - **`connection`**: Owns a client from accept to release and drives the pipeline
//! - **`parser`**: Reads the request line and headers from the stream
//! - **`request`**: Request representation and header list
//! - **`path`**: Maps the request URI into the document root
//! - **`response`**: Status codes and in-memory responses
//! - **`writer`**: Serializes status lines, headers and buffered responses
//! - **`mime`**: Content type lookup by file extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line and headers
//!        └──────┬──────┘
//!               │ parse error → Responding(Error 400)
//!               ▼
//!        ┌─────────────┐
//!        │  Resolving  │ ← Canonicalize URI inside the document root
//!        └──────┬──────┘
//!               │ not found / escapes root → Responding(Error 404)
//!               ▼
//!        ┌─────────────┐
//!        │ Dispatching │ ← Stat the path, pick a handler
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │ Responding  │ ← Browse / File / Cgi / Error writes to the stream
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │ → release(): shut the stream, drop the request
//!        └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spidey::http::connection::Connection;
//!
//! let mut conn = Connection::accept(&listener).await?;
//! let status = conn.run(&ctx).await;
//! conn.release().await;
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
