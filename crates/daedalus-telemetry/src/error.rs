//! Setup failures.

use thiserror::Error;

/// Why logging could not be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Directives that `EnvFilter` rejects.
    #[error("invalid log filter {0}")]
    InvalidFilter(String),

    /// Another global subscriber got there first.
    #[error("logging already initialized: {0}")]
    LoggingInit(String),
}
