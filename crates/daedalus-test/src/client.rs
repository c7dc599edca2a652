//! Test client for in-memory HTTP testing.

use bytes::Bytes;
use daedalus_server::Service;
use http::Method;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

/// Sends requests straight to a [`Service`] without binding a port.
///
/// ```
/// use daedalus_core::{HandlerError, Registry, RequestContext, Route};
/// use daedalus_test::TestClient;
/// use http::StatusCode;
///
/// async fn ping(_ctx: RequestContext, _input: ()) -> Result<String, HandlerError> {
///     Ok("pong".to_string())
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut registry = Registry::default();
/// registry.root().register(Route::get("/ping", ping));
/// let client = TestClient::new(registry.build().unwrap());
///
/// let response = client.get("/ping").send().await;
/// response.assert_status(StatusCode::OK);
/// assert_eq!(response.json::<String>().unwrap(), "pong");
/// # }
/// ```
#[must_use]
#[derive(Debug)]
pub struct TestClient<S> {
    service: S,
    default_headers: Vec<(String, String)>,
}

impl<S: Service> TestClient<S> {
    /// Creates a client for `service`.
    pub fn new(service: S) -> Self {
        Self {
            service,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The service under test.
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::PUT, uri)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::PATCH, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::DELETE, uri)
    }

    /// Creates a HEAD request builder.
    pub fn head(&self, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        self.request(Method::HEAD, uri)
    }

    /// Creates a request builder with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_, S> {
        let mut builder = TestRequestBuilder::new(method, uri);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        TestClientRequest {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a test client.
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a, S> {
    client: &'a TestClient<S>,
    builder: TestRequestBuilder,
}

impl<S: Service> TestClientRequest<'_, S> {
    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.builder = self.builder.content_type(content_type);
        self
    }

    /// Sets the Accept header.
    pub fn accept(mut self, accept: impl AsRef<str>) -> Self {
        self.builder = self.builder.accept(accept);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets the request body as YAML.
    pub fn yaml<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.yaml(value);
        self
    }

    /// Sets the request body as a URL-encoded form.
    pub fn form<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.form(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built; use
    /// [`try_send`](Self::try_send) to get the error instead.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request could not be built: {e}"),
        }
    }

    /// Sends the request, reporting build errors.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        Ok(self.client.service.call(request).await.into())
    }
}
