//! Response builders and the [`IntoResponse`] conversion.
//!
//! Render hooks return anything implementing [`IntoResponse`]:
//!
//! | Value | Content-Type |
//! |-------|--------------|
//! | `&'static str`, `String`, [`TextResponse`] | `text/plain; charset=utf-8` |
//! | [`JsonResponse`] | `application/json` |
//! | [`YamlResponse`] | `application/yaml` |
//! | [`HtmlResponse`] | `text/html; charset=utf-8` |
//! | [`NoContent`] | none (204) |
//! | [`ErrorResponse`] | `application/json` error body |
//! | `(StatusCode, R)` | whatever `R` sets, with the given status |
//!
//! # Example
//!
//! ```rust
//! use daedalus_extract::response::{IntoResponse, JsonResponse};
//! use http::StatusCode;
//!
//! let response = (StatusCode::ACCEPTED, "queued").into_response();
//! assert_eq!(response.status(), StatusCode::ACCEPTED);
//!
//! let response = JsonResponse::created(serde_json::json!({"id": 7})).into_response();
//! assert_eq!(response.status(), StatusCode::CREATED);
//! ```

use bytes::Bytes;
use daedalus_schema::{Describe, FieldViolation};
use http::{header, HeaderValue, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::media::APPLICATION_YAML;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Conversion into an HTTP response.
pub trait IntoResponse {
    /// Builds the response.
    fn into_response(self) -> Response<Bytes>;
}

/// Builds a response from parts.
pub(crate) fn respond(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Last resort when a builder cannot serialize its own payload.
fn serialization_failure(err: &dyn std::fmt::Display) -> Response<Bytes> {
    tracing::error!(error = %err, "failed to serialize response body");
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        TEXT_PLAIN,
        Bytes::from_static(b"internal server error"),
    )
}

impl IntoResponse for Response<Bytes> {
    fn into_response(self) -> Response<Bytes> {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response<Bytes> {
        respond(StatusCode::OK, TEXT_PLAIN, Bytes::from_static(self.as_bytes()))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response<Bytes> {
        respond(StatusCode::OK, TEXT_PLAIN, Bytes::from(self))
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = self;
        response
    }
}

impl<R: IntoResponse> IntoResponse for (StatusCode, R) {
    fn into_response(self) -> Response<Bytes> {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

impl<R: IntoResponse, E: IntoResponse> IntoResponse for Result<R, E> {
    fn into_response(self) -> Response<Bytes> {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// JSON response builder.
///
/// ```rust
/// use daedalus_extract::response::{IntoResponse, JsonResponse};
///
/// let response = JsonResponse::new(vec!["apple", "pear"]).into_response();
/// assert_eq!(response.headers()["content-type"], "application/json");
/// assert_eq!(&response.body()[..], br#"["apple","pear"]"#);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
    pretty: bool,
}

impl<T: Serialize> JsonResponse<T> {
    /// A 200 response.
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
            pretty: false,
        }
    }

    /// A 201 response.
    pub fn created(data: T) -> Self {
        Self::new(data).with_status(StatusCode::CREATED)
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Indents the output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the payload.
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response<Bytes> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(&self.data)
        } else {
            serde_json::to_vec(&self.data)
        };
        match body {
            Ok(body) => respond(self.status, "application/json", Bytes::from(body)),
            Err(err) => serialization_failure(&err),
        }
    }
}

/// YAML response builder.
#[derive(Debug)]
pub struct YamlResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> YamlResponse<T> {
    /// A 200 response.
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for YamlResponse<T> {
    fn into_response(self) -> Response<Bytes> {
        match serde_yaml::to_string(&self.data) {
            Ok(body) => respond(self.status, APPLICATION_YAML, Bytes::from(body)),
            Err(err) => serialization_failure(&err),
        }
    }
}

/// Plain text response builder.
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
}

impl TextResponse {
    /// A 200 response.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for TextResponse {
    fn into_response(self) -> Response<Bytes> {
        respond(self.status, TEXT_PLAIN, Bytes::from(self.body))
    }
}

/// HTML response builder.
#[derive(Debug, Clone)]
pub struct HtmlResponse {
    body: String,
    status: StatusCode,
}

impl HtmlResponse {
    /// A 200 response.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }
}

impl IntoResponse for HtmlResponse {
    fn into_response(self) -> Response<Bytes> {
        respond(self.status, "text/html; charset=utf-8", Bytes::from(self.body))
    }
}

/// 204 No Content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response<Bytes> {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// The error body every rejected or failed request carries.
///
/// ```json
/// {"kind": "validation-error", "message": "...", "errors": [{"field": "$.name", "message": "..."}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Describe)]
pub struct ErrorBody {
    /// Error kind, such as `validation-error` or `not-found`
    pub kind: String,
    /// Human-readable summary
    pub message: String,
    /// Field-level violations, empty when not applicable
    #[serde(default)]
    pub errors: Vec<FieldViolation>,
}

/// Error response builder producing an [`ErrorBody`].
///
/// ```rust
/// use daedalus_extract::response::{ErrorResponse, IntoResponse};
/// use http::StatusCode;
///
/// let response = ErrorResponse::new(StatusCode::NOT_FOUND, "not-found", "no fruit 7").into_response();
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    status: StatusCode,
    body: ErrorBody,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                kind: kind.into(),
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    /// Attaches field violations.
    #[must_use]
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.body.errors = violations;
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body.
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response<Bytes> {
        JsonResponse::new(self.body)
            .with_status(self.status)
            .into_response()
    }
}
