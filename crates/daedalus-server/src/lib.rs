//! # Daedalus Server
//!
//! HTTP server for Daedalus applications.
//!
//! - HTTP/1.1 via Hyper on a Tokio listener
//! - Request timeout covering body collection and handling
//! - Graceful shutdown on SIGTERM/SIGINT or an explicit [`ShutdownSignal`]
//!
//! Anything implementing [`Service`] can be served; a built
//! [`Api`](daedalus_core::Api) already does.
//!
//! ## Example
//!
//! ```rust,no_run
//! use daedalus_core::Registry;
//! use daedalus_server::{Server, ServerConfig, ShutdownSignal};
//!
//! # async fn run() -> Result<(), daedalus_server::ServerError> {
//! let api = Registry::default().build().expect("empty registry builds");
//! let shutdown = ShutdownSignal::new();
//!
//! let server = Server::new(ServerConfig::default(), api);
//! server.run_until(shutdown).await
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod server;
mod service;
mod shutdown;

pub use config::{
    ServerConfig, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use server::{Server, ServerError};
pub use service::Service;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownReceiver, ShutdownSignal};
