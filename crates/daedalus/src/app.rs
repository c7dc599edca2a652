//! The application: a built [`Api`] plus its document endpoint.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use daedalus_config::DaedalusConfig;
use daedalus_core::{Api, Registry, RegistrationErrors};
use daedalus_docs::DocumentEndpoint;
use daedalus_server::{Server, ServerConfig, ServerError, Service};
use http::{Method, Request, Response};

/// A servable application.
///
/// Requests for the document paths are answered by the [`DocumentEndpoint`];
/// everything else goes to the [`Api`]. Cloning is cheap.
///
/// ```
/// use daedalus::prelude::*;
/// use http::StatusCode;
///
/// async fn ping(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
///     Ok("pong".to_string())
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = DaedalusConfig::default();
/// let mut registry = Registry::new(config.registry_config());
/// registry.root().register(Route::get("/ping", ping));
/// let app = App::new(registry, &config).unwrap();
///
/// let request = http::Request::get("/openapi.json").body(bytes::Bytes::new()).unwrap();
/// assert_eq!(app.handle(request).await.status(), StatusCode::OK);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

#[derive(Debug)]
struct AppInner {
    api: Api,
    docs: Option<DocumentEndpoint>,
    config: DaedalusConfig,
}

impl App {
    /// Builds `registry` and serves it with `config`.
    ///
    /// Binding and rendering settings must already be in the registry (see
    /// [`DaedalusConfig::registry_config`]); `config` decides the document
    /// endpoint and the server settings.
    pub fn new(registry: Registry, config: &DaedalusConfig) -> Result<Self, RegistrationErrors> {
        let api = registry.build()?;
        Ok(Self::from_api(api, config))
    }

    /// Serves an already built [`Api`].
    pub fn from_api(api: Api, config: &DaedalusConfig) -> Self {
        let docs = config.openapi.enabled.then(|| {
            DocumentEndpoint::new(api.clone(), config.openapi.generator())
                .with_paths(config.openapi.paths())
        });

        if let Some(docs) = &docs {
            for route in api.routes() {
                let readable = route.method == Method::GET || route.method == Method::HEAD;
                if readable && docs.serves(&route.path) {
                    tracing::warn!(
                        method = %route.method,
                        path = %route.path,
                        "route is shadowed by the document endpoint"
                    );
                }
            }
        }

        tracing::info!(
            routes = api.len(),
            docs = docs.is_some(),
            "application ready"
        );

        Self {
            inner: Arc::new(AppInner {
                api,
                docs,
                config: config.clone(),
            }),
        }
    }

    /// The registered routes.
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// The document endpoint, unless `openapi.enabled` is off.
    pub fn docs(&self) -> Option<&DocumentEndpoint> {
        self.inner.docs.as_ref()
    }

    /// The configuration the app was built with.
    pub fn config(&self) -> &DaedalusConfig {
        &self.inner.config
    }

    /// Answers a request.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        if let Some(response) = self.inner.docs.as_ref().and_then(|docs| docs.handle(&request)) {
            return response;
        }
        self.inner.api.handle(request).await
    }

    /// A server for this app using the `server` section of the config.
    pub fn server(self) -> Server<Self> {
        let section = &self.inner.config.server;
        let request_timeout = (section.request_timeout_ms > 0)
            .then(|| Duration::from_millis(section.request_timeout_ms));
        let config = ServerConfig::new(section.http_addr.clone())
            .with_shutdown_timeout(Duration::from_secs(section.shutdown_timeout_secs))
            .with_request_timeout(request_timeout);
        Server::new(config, self)
    }

    /// Serves the app until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.server().run().await
    }
}

impl Service for App {
    async fn call(&self, request: Request<Bytes>) -> Response<Bytes> {
        self.handle(request).await
    }
}
