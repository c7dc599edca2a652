//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use serde::Serialize;

use crate::error::TestError;

/// Builder for requests sent through a [`TestClient`](crate::TestClient).
///
/// Invalid headers or bodies do not fail immediately; the first error is
/// kept and reported by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Sets a header on the request, replacing earlier values.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.fail(TestError::InvalidHeader(e.to_string())),
            (_, Err(e)) => self.fail(TestError::InvalidHeader(e.to_string())),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Accept header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the body as JSON along with its Content-Type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/json")
    }

    /// Sets the body as YAML along with its Content-Type.
    pub fn yaml<T: Serialize>(mut self, value: &T) -> Self {
        match serde_yaml::to_string(value) {
            Ok(text) => self.body = Bytes::from(text),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/yaml")
    }

    /// Sets the body as `application/x-www-form-urlencoded`.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Bytes::from(encoded),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building, or
    /// [`TestError::RequestBuild`] if the URI does not parse.
    pub fn build(self) -> Result<Request<Bytes>, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI {}: {e}", self.uri)))?;

        let mut request = Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    fn fail(&mut self, error: TestError) {
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_sets_content_type() {
        let request = TestRequestBuilder::new(Method::POST, "/market")
            .json(&json!({"name": "kiwi"}))
            .build()
            .unwrap();
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(&request.body()[..], br#"{"name":"kiwi"}"#);
    }

    #[test]
    fn test_form_body() {
        let request = TestRequestBuilder::new(Method::POST, "/market")
            .form(&vec![("name", "kiwi"), ("price", "2")])
            .build()
            .unwrap();
        assert_eq!(&request.body()[..], b"name=kiwi&price=2");
    }

    #[test]
    fn test_invalid_header_is_reported_on_build() {
        let err = TestRequestBuilder::new(Method::GET, "/")
            .header("bad header", "x")
            .header("x-fine", "y")
            .build()
            .unwrap_err();
        assert!(matches!(err, TestError::InvalidHeader(_)));
    }

    #[test]
    fn test_invalid_uri() {
        let err = TestRequestBuilder::new(Method::GET, "http://[::1").build().unwrap_err();
        assert!(matches!(err, TestError::RequestBuild(_)));
    }
}
