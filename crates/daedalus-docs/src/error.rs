//! Error types for document generation and serving.

use thiserror::Error;

/// Errors raised while serializing the generated document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("failed to serialize OpenAPI document as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to serialize the document to YAML.
    #[error("failed to serialize OpenAPI document as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
