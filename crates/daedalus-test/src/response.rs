//! What a [`TestClient`](crate::TestClient) hands back.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A buffered response with decoding helpers and chainable assertions.
///
/// Assertions print the body on failure, which is usually the error document
/// explaining what went wrong.
#[derive(Debug)]
pub struct TestResponse {
    inner: Response<Bytes>,
}

impl From<Response<Bytes>> for TestResponse {
    fn from(inner: Response<Bytes>) -> Self {
        Self { inner }
    }
}

impl TestResponse {
    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// All response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// One header value.
    #[must_use]
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    /// A header as text; `None` when absent or not visible ASCII.
    #[must_use]
    pub fn header_str(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Full `Content-Type`, parameters included.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// The body as UTF-8.
    ///
    /// # Errors
    ///
    /// [`TestError::BodyRead`] if it is not.
    pub fn text(&self) -> Result<String, TestError> {
        std::str::from_utf8(self.body())
            .map(str::to_owned)
            .map_err(|e| TestError::BodyRead(e.to_string()))
    }

    /// The body decoded as JSON.
    ///
    /// # Errors
    ///
    /// [`TestError::Json`] if the body does not decode into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(self.body())?)
    }

    /// The body as an untyped JSON tree, handy for poking at documents.
    ///
    /// # Errors
    ///
    /// [`TestError::Json`] if the body is not JSON.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// The body decoded as YAML.
    ///
    /// # Errors
    ///
    /// [`TestError::Yaml`] if the body does not decode into `T`.
    pub fn yaml<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_yaml::from_slice(self.body())?)
    }

    fn lossy_body(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.body())
    }

    /// # Panics
    ///
    /// When the status differs.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert!(
            self.status() == expected,
            "expected status {expected}, got {} with body {}",
            self.status(),
            self.lossy_body()
        );
        self
    }

    /// Compares the media type only, so `text/html; charset=utf-8` passes
    /// for `text/html`.
    ///
    /// # Panics
    ///
    /// When the header is missing or names another media type.
    #[track_caller]
    pub fn assert_content_type(&self, expected: &str) -> &Self {
        let essence = self
            .content_type()
            .and_then(|v| v.split(';').next())
            .map(str::trim);
        assert!(
            essence == Some(expected),
            "expected content type {expected}, got {:?}",
            self.content_type()
        );
        self
    }

    /// # Panics
    ///
    /// When `needle` does not occur in the body.
    #[track_caller]
    pub fn assert_body_contains(&self, needle: &str) -> &Self {
        let body = self.lossy_body();
        assert!(body.contains(needle), "{needle:?} not found in body {body}");
        self
    }

    /// # Panics
    ///
    /// When the body is not JSON or is not equal to `expected`.
    #[track_caller]
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual = self
            .json_value()
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.lossy_body()));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: StatusCode, content_type: &'static str, body: &'static str) -> TestResponse {
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
            .into()
    }

    #[test]
    fn test_chained_assertions() {
        response(StatusCode::OK, "application/json", r#"{"name":"kiwi"}"#)
            .assert_status(StatusCode::OK)
            .assert_content_type("application/json")
            .assert_body_contains("kiwi")
            .assert_json_eq(&json!({"name": "kiwi"}));
    }

    #[test]
    fn test_decoders() {
        let yaml = response(StatusCode::OK, "application/yaml", "name: kiwi\n");
        let value: serde_json::Value = yaml.yaml().unwrap();
        assert_eq!(value, json!({"name": "kiwi"}));
        assert_eq!(yaml.text().unwrap(), "name: kiwi\n");
        assert!(yaml.json_value().is_err());
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        response(StatusCode::OK, "text/html; charset=utf-8", "<html>")
            .assert_content_type("text/html");
    }

    #[test]
    #[should_panic(expected = "expected status 201 Created")]
    fn test_wrong_status_panics() {
        response(StatusCode::OK, "text/plain", "").assert_status(StatusCode::CREATED);
    }
}
