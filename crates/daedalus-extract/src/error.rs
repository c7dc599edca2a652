//! Binding and rendering errors.

use std::fmt;

use daedalus_schema::FieldViolation;
use http::StatusCode;
use thiserror::Error;

use crate::response::{ErrorResponse, IntoResponse};

/// Which stage of binding rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindErrorKind {
    /// The body could not be read as the declared media type, was too large,
    /// or the media type is not accepted.
    Decode,
    /// The decoded value does not match the input schema.
    Validation,
}

impl BindErrorKind {
    /// Wire name used in the error body's `kind` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode-error",
            Self::Validation => "validation-error",
        }
    }
}

impl fmt::Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request.
///
/// When a binder fails the handler is never invoked; the error is rendered
/// straight to the client with [`BindError::status`].
///
/// # Example
///
/// ```rust
/// use daedalus_extract::{BindError, BindErrorKind};
/// use daedalus_schema::FieldViolation;
/// use http::StatusCode;
///
/// let err = BindError::validation(vec![FieldViolation::new("$.name", "missing required property 'name'")])
///     .with_status(StatusCode::UNPROCESSABLE_ENTITY);
///
/// assert_eq!(err.kind(), BindErrorKind::Validation);
/// assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
/// assert_eq!(err.violations().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BindError {
    kind: BindErrorKind,
    message: String,
    violations: Vec<FieldViolation>,
    status: StatusCode,
}

impl BindError {
    /// A decode failure with status 400.
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: BindErrorKind::Decode,
            message: message.into(),
            violations: Vec::new(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// A validation failure with status 400.
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let message = match violations.as_slice() {
            [] => "request does not match the input schema".to_string(),
            [only] => only.to_string(),
            [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
        };
        Self {
            kind: BindErrorKind::Validation,
            message,
            violations,
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// The body exceeds the configured limit (413).
    pub fn payload_too_large(max_bytes: usize, actual: usize) -> Self {
        Self::decode(format!(
            "payload too large: max {max_bytes} bytes, got {actual} bytes"
        ))
        .with_status(StatusCode::PAYLOAD_TOO_LARGE)
    }

    /// The media type cannot be decoded (415).
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual = actual.unwrap_or("none");
        Self::decode(format!(
            "unsupported content type: expected {expected}, got '{actual}'"
        ))
        .with_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    }

    /// Overrides the response status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Failure stage.
    pub fn kind(&self) -> BindErrorKind {
        self.kind
    }

    /// Human-readable summary.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every field-level problem found.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for BindError {
    fn into_response(self) -> http::Response<bytes::Bytes> {
        ErrorResponse::new(self.status, self.kind.as_str(), self.message)
            .with_violations(self.violations)
            .into_response()
    }
}

/// The default renderer could not produce a body.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON serialization failed.
    #[error("failed to serialize response as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("failed to serialize response as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The response media type has no serializer.
    #[error("no serializer for response media type {0}")]
    UnsupportedMediaType(String),
}
