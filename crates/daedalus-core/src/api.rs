//! The frozen, servable API.
//!
//! [`Api`] is what [`Registry::build`](crate::Registry::build) produces: the
//! route descriptions for documentation, the request pipeline of every route
//! and the router that picks between them. It is cheap to clone and shared
//! across request tasks without locks.

use std::sync::Arc;

use bytes::Bytes;
use daedalus_extract::{ErrorResponse, ExtractionContext, IntoResponse};
use daedalus_router::Router;
use daedalus_schema::{SchemaArena, SchemaDescription};
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use tracing::Instrument;

use crate::context::{RequestContext, RequestId, REQUEST_ID_HEADER};
use crate::handler::BoxFuture;
use crate::info::{RouteId, RouteInfo, TagInfo};

/// One route's bind, handle and render pipeline with its types erased.
pub(crate) type Endpoint = Arc<
    dyn Fn(RequestContext, ExtractionContext, &SchemaArena) -> BoxFuture<'static, Response<Bytes>>
        + Send
        + Sync,
>;

struct ApiInner {
    routes: Vec<RouteInfo>,
    order: Vec<RouteId>,
    endpoints: Vec<Endpoint>,
    router: Router<RouteId>,
    schemas: SchemaArena,
    tags: Vec<TagInfo>,
    error_schema: SchemaDescription,
}

/// A frozen registry.
///
/// ```
/// use bytes::Bytes;
/// use daedalus_core::{HandlerError, Registry, RequestContext, Route};
/// use http::{Request, StatusCode};
///
/// async fn ping(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
///     Ok("pong".to_string())
/// }
///
/// let mut registry = Registry::default();
/// registry.root().register(Route::get("/ping", ping));
/// let api = registry.build().unwrap();
///
/// let request = Request::get("/ping").body(Bytes::new()).unwrap();
/// let response = tokio_test::block_on(api.handle(request));
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(&response.body()[..], b"\"pong\"");
/// ```
#[derive(Clone)]
pub struct Api {
    inner: Arc<ApiInner>,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("routes", &self.inner.routes.len())
            .field("schemas", &self.inner.schemas.len())
            .field("tags", &self.inner.tags)
            .finish_non_exhaustive()
    }
}

impl Api {
    pub(crate) fn new(
        routes: Vec<RouteInfo>,
        order: Vec<RouteId>,
        endpoints: Vec<Endpoint>,
        router: Router<RouteId>,
        schemas: SchemaArena,
        tags: Vec<TagInfo>,
        error_schema: SchemaDescription,
    ) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                routes,
                order,
                endpoints,
                router,
                schemas,
                tags,
                error_schema,
            }),
        }
    }

    /// Routes in documentation order: registration order within a group,
    /// groups depth-first in the order they were opened.
    pub fn routes(&self) -> impl Iterator<Item = &RouteInfo> {
        self.inner
            .order
            .iter()
            .filter_map(|id| self.inner.routes.get(id.0))
    }

    /// Looks up a route.
    pub fn route(&self, id: RouteId) -> Option<&RouteInfo> {
        self.inner.routes.get(id.0)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.inner.routes.len()
    }

    /// True if no route was registered.
    pub fn is_empty(&self) -> bool {
        self.inner.routes.is_empty()
    }

    /// Every named schema.
    pub fn schemas(&self) -> &SchemaArena {
        &self.inner.schemas
    }

    /// Group tags with their descriptions, in group order.
    pub fn tags(&self) -> &[TagInfo] {
        &self.inner.tags
    }

    /// Schema of the error body every failed request carries.
    pub fn error_schema(&self) -> &SchemaDescription {
        &self.inner.error_schema
    }

    /// Answers a request.
    ///
    /// Never fails: unknown paths get 404, known paths with another method
    /// 405 with an `Allow` header, and everything else goes through the
    /// matched route's pipeline. The request id is echoed in `x-request-id`.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let request_id = RequestId::from_headers(request.headers());
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
            operation_id = tracing::field::Empty,
        );

        let mut response = self.dispatch(request, request_id).instrument(span).await;
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }

    async fn dispatch(&self, request: Request<Bytes>, request_id: RequestId) -> Response<Bytes> {
        let (parts, body) = request.into_parts();

        let Some((methods, params)) = self.inner.router.match_path(parts.uri.path()) else {
            tracing::debug!("no route");
            return ErrorResponse::new(
                StatusCode::NOT_FOUND,
                "not-found",
                format!("no route for {} {}", parts.method, parts.uri.path()),
            )
            .into_response();
        };

        let Some(id) = methods.get(&parts.method).copied() else {
            let allowed = methods
                .allowed_methods()
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::debug!(allow = %allowed, "method not allowed");
            let mut response = ErrorResponse::new(
                StatusCode::METHOD_NOT_ALLOWED,
                "method-not-allowed",
                format!("{} is not allowed on {}", parts.method, parts.uri.path()),
            )
            .into_response();
            if let Ok(value) = HeaderValue::from_str(&allowed) {
                response.headers_mut().insert(header::ALLOW, value);
            }
            return response;
        };

        let (Some(info), Some(endpoint)) =
            (self.inner.routes.get(id.0), self.inner.endpoints.get(id.0))
        else {
            tracing::error!(route = id.0, "router points at a missing route");
            return ErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal-error",
                "route table is inconsistent",
            )
            .into_response();
        };
        tracing::Span::current().record("operation_id", info.operation_id.as_str());

        let head = parts.method == Method::HEAD;
        let ctx = RequestContext::from_parts(request_id, &parts)
            .with_operation_id(info.operation_id.clone());
        let request = ExtractionContext::from_request(Request::from_parts(parts, body), params);

        let mut response = endpoint(ctx, request, &self.inner.schemas).await;
        if head {
            *response.body_mut() = Bytes::new();
        }
        response
    }
}
