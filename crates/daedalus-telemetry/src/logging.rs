//! Subscriber installation.
//!
//! One `tracing-subscriber` registry, one fmt layer behind an [`EnvFilter`].
//! The dispatcher opens a span per request carrying `request_id`, `method`,
//! `path` and `operation_id`; events inside handlers inherit those fields.
//!
//! ```rust
//! use daedalus_telemetry::{init_logging, LogConfig, LogOutput};
//!
//! let config = LogConfig {
//!     output: LogOutput::Compact,
//!     ..LogConfig::default()
//! };
//! init_logging(&config).ok();
//!
//! tracing::info!(operation_id = "get_market", "serving");
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Directives in this variable win over [`LogConfig::filter`].
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// How events are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, for reading in a terminal.
    Pretty,
    /// One plain line per event.
    Compact,
}

/// What [`init_logging`] installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `false` installs nothing.
    pub enabled: bool,
    /// A level (`"info"`) or full directives (`"info,daedalus_core=debug"`).
    pub filter: String,
    /// Line format.
    pub output: LogOutput,
    /// Record source file and line.
    pub location: bool,
    /// Color codes; ignored for JSON.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: "info".to_string(),
            output: LogOutput::Json,
            location: false,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Pretty, colored, `debug` and with locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            output: LogOutput::Pretty,
            location: true,
            ansi: true,
            ..Self::default()
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] when neither `RUST_LOG` nor the
/// configured filter parses, [`TelemetryError::LoggingInit`] when a global
/// subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = resolve_filter(env.as_deref(), &config.filter)?;

    tracing_subscriber::registry()
        .with(fmt_layer(config).with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = tracing_subscriber::fmt::layer()
        .with_file(config.location)
        .with_line_number(config.location);

    match config.output {
        LogOutput::Json => base.json().with_ansi(false).boxed(),
        LogOutput::Pretty => base.pretty().with_ansi(config.ansi).boxed(),
        LogOutput::Compact => base.compact().with_ansi(config.ansi).boxed(),
    }
}

/// The filter to install: `env` when it has any directives, otherwise
/// `configured`.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] naming the rejected directives.
pub fn resolve_filter(env: Option<&str>, configured: &str) -> TelemetryResult<EnvFilter> {
    let directives = env
        .map(str::trim)
        .filter(|env| !env.is_empty())
        .unwrap_or(configured);
    EnvFilter::try_new(directives)
        .map_err(|e| TelemetryError::InvalidFilter(format!("{directives}: {e}")))
}
