//! What a binder gets to look at.

use bytes::Bytes;
use daedalus_router::Params;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use serde::de::DeserializeOwned;

use crate::error::BindError;

/// A buffered request plus the path parameters the router captured.
///
/// Bind hooks see exactly this; nothing has been decoded yet.
///
/// ```rust
/// use bytes::Bytes;
/// use daedalus_extract::ExtractionContext;
/// use daedalus_router::Params;
/// use http::Request;
///
/// let mut params = Params::new();
/// params.push("id", "7");
/// let request = Request::get("/fruits/7").body(Bytes::new()).unwrap();
///
/// let ctx = ExtractionContext::from_request(request, params);
/// assert_eq!(ctx.path(), "/fruits/7");
/// assert_eq!(ctx.path_params().get("id"), Some("7"));
/// ```
#[derive(Debug)]
pub struct ExtractionContext {
    request: Request<Bytes>,
    params: Params,
}

impl ExtractionContext {
    /// Pairs a buffered request with its path parameters.
    #[must_use]
    pub fn from_request(request: Request<Bytes>, params: Params) -> Self {
        Self { request, params }
    }

    /// `GET /` with nothing attached, to be filled in by the returned
    /// builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::default()
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Request target as received.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    /// Path without the query.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri().path()
    }

    /// Raw query string without the `?`.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri().query()
    }

    /// Decodes the query string into `T`; no query string decodes like an
    /// empty one.
    ///
    /// # Errors
    ///
    /// A decode [`BindError`] when the query does not fit `T`.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        crate::query::parse_query(self.query_string())
    }

    /// All request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// A header as text; `None` if absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, parameters included.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE)
    }

    /// The whole body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Whether the body has no bytes.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body().is_empty()
    }

    /// Parameters captured from the route pattern.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.params
    }
}

/// Fluent construction of an [`ExtractionContext`], mostly for tests.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    request: Request<Bytes>,
    params: Params,
}

impl ExtractionContextBuilder {
    /// Replaces the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        *self.request.method_mut() = method;
        self
    }

    /// Replaces the request target.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        *self.request.uri_mut() = uri;
        self
    }

    /// Sets a header, replacing earlier values. Names or values that are not
    /// valid HTTP are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.request.headers_mut().insert(name, value);
        }
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        *self.request.body_mut() = body.into();
        self
    }

    /// Adds a captured path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(name, value);
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext::from_request(self.request, self.params)
    }
}
