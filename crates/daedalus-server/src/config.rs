//! Listener settings for [`Server`](crate::Server).
//!
//! ```rust
//! use daedalus_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::new("127.0.0.1:8080")
//!     .with_shutdown_timeout(Duration::from_secs(10))
//!     .with_request_timeout(None);
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:8080");
//! assert_eq!(config.request_timeout(), None);
//! ```

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

/// Address used by [`ServerConfig::default`].
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Seconds in-flight connections get to finish once shutdown starts.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Seconds a single request may take, body included.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where to listen and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Listens on `http_addr` with the default timeouts.
    #[must_use]
    pub fn new(http_addr: impl Into<String>) -> Self {
        Self {
            http_addr: http_addr.into(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }

    /// Grace period for in-flight connections on shutdown.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// `None` lets requests run unbounded.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The configured bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// The address as a [`SocketAddr`]. Host names are not resolved.
    ///
    /// # Errors
    ///
    /// Fails when the address is not a literal `ip:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.http_addr.parse()
    }

    /// Grace period for in-flight connections.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Per-request limit, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_ADDR)
    }
}
