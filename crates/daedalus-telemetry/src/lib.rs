//! Log output for Daedalus services.
//!
//! The other crates only emit `tracing` events and spans. A binary calls
//! [`init_logging`] once at startup to decide where those go and in what
//! shape.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, resolve_filter, LogConfig, LogOutput, LOG_ENV_VAR};

/// Shorthand for results of this crate.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
