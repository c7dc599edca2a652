//! Failures while preparing a request or decoding a response.

use thiserror::Error;

/// Why a test request could not be sent or its response not decoded.
#[derive(Debug, Error)]
pub enum TestError {
    /// The URI or some other part of the request is malformed.
    #[error("cannot build request: {0}")]
    RequestBuild(String),

    /// A header name or value that HTTP does not allow.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The body is not UTF-8.
    #[error("body is not text: {0}")]
    BodyRead(String),

    /// JSON in either direction.
    #[error("JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoding a YAML body.
    #[error("YAML body: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Encoding a form body.
    #[error("form body: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TestError::InvalidHeader("bad name".to_string());
        assert_eq!(err.to_string(), "invalid header: bad name");

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(TestError::from(json).to_string().starts_with("JSON body: "));
    }
}
