//! Spidey - minimal HTTP/1.0 origin server
//!
//! Serves static files, lists directories and runs executables as CGI
//! scripts, picking the behaviour from the metadata of the requested path.

pub mod config;
pub mod handlers;
pub mod http;
pub mod server;
pub mod thor;
