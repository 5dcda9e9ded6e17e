//! Listening socket and the two concurrency drivers.
//!
//! - **`single`**: accept, serve and release one connection at a time
//! - **`forking`**: hand every accepted connection to its own worker task
//!
//! Both run until the process is terminated.

pub mod context;
pub mod forking;
pub mod listener;
pub mod single;

pub use context::ServerContext;
pub use forking::{ServeError, WorkerLimits};
