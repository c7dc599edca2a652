//! HTTP server implementation.
//!
//! The server accepts connections on a Tokio listener and serves each one
//! with Hyper's HTTP/1.1 connection driver. Request bodies are collected in
//! full before the [`Service`] sees the request.
//!
//! On shutdown the listener stops accepting, every open connection is asked
//! to finish its in-flight request and close, and the server waits up to the
//! configured timeout for them to drain.

use std::convert::Infallible;
use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use daedalus_extract::{ErrorResponse, IntoResponse};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::service::Service;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address does not parse.
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The Daedalus HTTP server.
///
/// # Example
///
/// ```rust,no_run
/// use daedalus_core::{HandlerError, Registry, RequestContext, Route};
/// use daedalus_server::{Server, ServerConfig};
///
/// async fn ping(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
///     Ok("pong".to_string())
/// }
///
/// # async fn run() -> Result<(), daedalus_server::ServerError> {
/// let mut registry = Registry::default();
/// registry.root().register(Route::get("/ping", ping));
/// let api = registry.build().expect("valid registry");
///
/// let config = ServerConfig::new("127.0.0.1:8080");
/// Server::new(config, api).run().await
/// # }
/// ```
#[derive(Debug)]
pub struct Server<S> {
    config: ServerConfig,
    service: Arc<S>,
}

impl<S: Service> Server<S> {
    /// Creates a server for `service`.
    pub fn new(config: ServerConfig, service: S) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the service requests are handed to.
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidAddress`] or [`ServerError::Bind`].
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(ShutdownSignal::with_os_signals()).await
    }

    /// Runs the server until `shutdown` is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run_until(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// is triggered, then drains open connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let tracker = ConnectionTracker::new();
        let request_timeout = self.config.request_timeout();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let service = Arc::clone(&self.service);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = serve_connection(service, stream, request_timeout, shutdown).await {
                                    tracing::debug!(remote = %remote_addr, error = %e, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }
        drop(listener);

        let shutdown_timeout = self.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            connections = tracker.active_connections(),
            "waiting for connections to close"
        );

        tokio::select! {
            _ = tracker.wait_for_shutdown() => {
                tracing::info!("all connections closed");
            }
            _ = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    connections = tracker.active_connections(),
                    "shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn serve_connection<S: Service>(
    service: Arc<S>,
    stream: TcpStream,
    request_timeout: Option<Duration>,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let handler = service_fn(move |request: Request<Incoming>| {
        let service = Arc::clone(&service);
        async move {
            let response = respond(service.as_ref(), request, request_timeout).await;
            Ok::<_, Infallible>(response.map(Full::new))
        }
    });

    let conn = http1::Builder::new().serve_connection(io, handler);
    tokio::pin!(conn);

    let mut stop = shutdown.recv();
    tokio::select! {
        result = conn.as_mut() => return result,
        _ = &mut stop => {}
    }

    // Let the in-flight request finish, then close.
    conn.as_mut().graceful_shutdown();
    conn.await
}

/// Collects the body and calls the service, both within the request timeout.
async fn respond<S: Service>(
    service: &S,
    request: Request<Incoming>,
    request_timeout: Option<Duration>,
) -> Response<Bytes> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let exchange = async {
        let (parts, body) = request.into_parts();
        match body.collect().await {
            Ok(collected) => {
                service
                    .call(Request::from_parts(parts, collected.to_bytes()))
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                ErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    "body-read-error",
                    format!("failed to read request body: {e}"),
                )
                .into_response()
            }
        }
    };

    let Some(limit) = request_timeout else {
        return exchange.await;
    };
    match tokio::time::timeout(limit, exchange).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%method, %path, timeout = ?limit, "request timed out");
            ErrorResponse::new(
                StatusCode::REQUEST_TIMEOUT,
                "request-timeout",
                format!("{method} {path} did not complete within {limit:?}"),
            )
            .into_response()
        }
    }
}
