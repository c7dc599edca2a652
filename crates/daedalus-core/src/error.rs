//! Error types.
//!
//! [`HandlerError`] is what business handlers return; it renders as the
//! shared error body with the status of its [`ErrorCategory`].
//! [`RegistrationError`] is what the registry collects while routes are
//! added.

use std::fmt;

use bytes::Bytes;
use daedalus_extract::{ErrorResponse, IntoResponse};
use daedalus_schema::SchemaError;
use http::{Method, Response, StatusCode};
use thiserror::Error;

/// Broad classes of handler failure, each with a fixed HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request is malformed for business reasons (400).
    Validation,
    /// The caller is not authenticated (401).
    Authentication,
    /// The caller may not do this (403).
    Authorization,
    /// The addressed resource does not exist (404).
    NotFound,
    /// The request conflicts with current state (409).
    Conflict,
    /// Well-formed but semantically unacceptable (422).
    Unprocessable,
    /// Something broke on our side (500).
    Internal,
    /// A dependency is down (503).
    Unavailable,
}

impl ErrorCategory {
    /// The status code errors of this category are answered with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The `kind` written to the error body.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "bad-request",
            Self::Authentication => "unauthenticated",
            Self::Authorization => "forbidden",
            Self::NotFound => "not-found",
            Self::Conflict => "conflict",
            Self::Unprocessable => "unprocessable",
            Self::Internal => "internal-error",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by handlers.
///
/// The core treats it as opaque: it is rendered with its category's status
/// and message, and the optional source is only logged.
///
/// # Example
///
/// ```
/// use daedalus_core::{ErrorCategory, HandlerError};
///
/// let err = HandlerError::not_found("no fruit named kiwi");
/// assert_eq!(err.category(), ErrorCategory::NotFound);
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
#[error("{category}: {message}")]
pub struct HandlerError {
    category: ErrorCategory,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl HandlerError {
    /// Creates an error of any category.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            source: None,
        }
    }

    /// 400.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    /// 401.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authentication, message)
    }

    /// 403.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authorization, message)
    }

    /// 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    /// 409.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Conflict, message)
    }

    /// 422.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unprocessable, message)
    }

    /// 500.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }

    /// 503.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unavailable, message)
    }

    /// Attaches the underlying cause. It is logged, never sent to the client.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    /// The client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The category's status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category.status_code()
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            category: ErrorCategory::Internal,
            message: "internal error".to_string(),
            source: Some(err),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response<Bytes> {
        ErrorResponse::new(self.status_code(), self.category.as_str(), self.message).into_response()
    }
}

/// Result alias for handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// A problem found while registering a route.
///
/// Registration never panics; these are collected on the
/// [`Registry`](crate::Registry) and reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The method is already registered on this path. The later route is
    /// dropped.
    #[error("duplicate route {method} {path}")]
    DuplicateRoute {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
    },

    /// A path parameter that nothing binds or documents.
    #[error("path parameter {{{parameter}}} of {method} {path} is not a field of the input or input model and has no path parameter annotation")]
    UnresolvedPathParameter {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
        /// Parameter name
        parameter: String,
    },

    /// Two distinct types described for this route share a schema name.
    #[error("{method} {path}: {source}")]
    TypeNameCollision {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
        /// The collision
        source: SchemaError,
    },

    /// The default binder or renderer would face a type it cannot handle.
    #[error("{method} {path} {side}: {source}")]
    UnsupportedType {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
        /// `input` or `output`
        side: &'static str,
        /// The unsupported node
        source: SchemaError,
    },

    /// The path template is malformed or clashes with the parameter names of
    /// an existing route.
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// Path template as given
        path: String,
        /// What is wrong
        reason: String,
    },

    /// A media type override the default binder or renderer cannot handle.
    /// Routes with a bind or render hook on that side are exempt.
    #[error("{method} {path} {side}: default codec cannot handle '{media_type}': {reason}")]
    UnsupportedMediaType {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
        /// `input` or `output`
        side: &'static str,
        /// The override as given
        media_type: String,
        /// What is missing
        reason: &'static str,
    },

    /// A request or response media type override does not parse.
    #[error("{method} {path}: invalid media type '{media_type}'")]
    InvalidMediaType {
        /// HTTP method
        method: Method,
        /// Full path template
        path: String,
        /// The rejected value
        media_type: String,
    },
}

/// Every registration error of a registry, returned by
/// [`Registry::build`](crate::Registry::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct RegistrationErrors(Vec<RegistrationError>);

impl RegistrationErrors {
    pub(crate) fn new(errors: Vec<RegistrationError>) -> Self {
        Self(errors)
    }

    /// The individual errors, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[RegistrationError] {
        &self.0
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a value returned by `build`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_inner(self) -> Vec<RegistrationError> {
        self.0
    }
}

impl fmt::Display for RegistrationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} registration error(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl IntoIterator for RegistrationErrors {
    type Item = RegistrationError;
    type IntoIter = std::vec::IntoIter<RegistrationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories_have_status_codes() {
        let cases = [
            (ErrorCategory::Validation, 400),
            (ErrorCategory::Authentication, 401),
            (ErrorCategory::Authorization, 403),
            (ErrorCategory::NotFound, 404),
            (ErrorCategory::Conflict, 409),
            (ErrorCategory::Unprocessable, 422),
            (ErrorCategory::Internal, 500),
            (ErrorCategory::Unavailable, 503),
        ];
        for (category, status) in cases {
            assert_eq!(category.status_code().as_u16(), status, "{category}");
        }
    }

    #[test]
    fn test_handler_error_renders_error_body() {
        let response = HandlerError::conflict("fruit already listed").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["kind"], "conflict");
        assert_eq!(body["message"], "fruit already listed");
        assert_eq!(body["errors"], serde_json::json!([]));
    }

    #[test]
    fn test_anyhow_becomes_internal_and_hides_cause() {
        let err: HandlerError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(std::error::Error::source(&err).is_some());

        let body: serde_json::Value =
            serde_json::from_slice(err.into_response().body()).unwrap();
        assert_eq!(body["message"], "internal error");
    }

    #[test]
    fn test_registration_errors_display() {
        let errors = RegistrationErrors::new(vec![
            RegistrationError::DuplicateRoute {
                method: Method::GET,
                path: "/market".to_string(),
            },
            RegistrationError::InvalidPath {
                path: "/a/*rest/b".to_string(),
                reason: "wildcard must be the last segment".to_string(),
            },
        ]);
        let text = errors.to_string();
        assert!(text.starts_with("2 registration error(s)"));
        assert!(text.contains("duplicate route GET /market"));
    }
}
