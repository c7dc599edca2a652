//! Configuration section types.
//!
//! Every section rejects unknown keys and defaults each missing field on its
//! own, so a file only needs to name what it changes.

use daedalus_docs::{DocumentPaths, OpenApiGenerator};
use daedalus_extract::{BindConfig, DEFAULT_MAX_BODY_BYTES};
use daedalus_telemetry::{LogConfig, LogOutput};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Server configuration section.
///
/// # Example
///
/// ```
/// use daedalus_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.shutdown_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds; 0 disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30000
}

/// Document generation and serving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OpenApiConfig {
    /// Serve the document endpoints.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `info.title`.
    #[serde(default = "default_title")]
    pub title: String,

    /// `info.version`.
    #[serde(default = "default_version")]
    pub version: String,

    /// `info.description`; empty leaves it out.
    #[serde(default)]
    pub description: String,

    /// Path of the JSON document.
    #[serde(default = "default_json_path")]
    pub json_path: String,

    /// Path of the YAML document.
    #[serde(default = "default_yaml_path")]
    pub yaml_path: String,

    /// Path of the document negotiated by `Accept`.
    #[serde(default = "default_negotiated_path")]
    pub negotiated_path: String,

    /// Path of the Swagger UI page; empty disables it.
    #[serde(default = "default_swagger_path")]
    pub swagger_path: String,

    /// Document the 400 and 500 error bodies on every operation.
    #[serde(default = "default_true")]
    pub default_error_responses: bool,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_title(),
            version: default_version(),
            description: String::new(),
            json_path: default_json_path(),
            yaml_path: default_yaml_path(),
            negotiated_path: default_negotiated_path(),
            swagger_path: default_swagger_path(),
            default_error_responses: true,
        }
    }
}

impl OpenApiConfig {
    /// The generator these settings describe.
    pub fn generator(&self) -> OpenApiGenerator {
        OpenApiGenerator::new()
            .title(self.title.clone())
            .version(self.version.clone())
            .description(self.description.clone())
            .default_error_responses(self.default_error_responses)
    }

    /// Where the document is served.
    pub fn paths(&self) -> DocumentPaths {
        DocumentPaths {
            json: self.json_path.clone(),
            yaml: self.yaml_path.clone(),
            negotiated: self.negotiated_path.clone(),
            swagger: (!self.swagger_path.is_empty()).then(|| self.swagger_path.clone()),
        }
    }
}

fn default_title() -> String {
    "Daedalus API".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_json_path() -> String {
    "/openapi.json".to_string()
}

fn default_yaml_path() -> String {
    "/openapi.yaml".to_string()
}

fn default_negotiated_path() -> String {
    "/openapi".to_string()
}

fn default_swagger_path() -> String {
    "/swagger".to_string()
}

/// Default binder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Status of decode and validation failures (400 or 422 are usual).
    #[serde(default = "default_error_status")]
    pub error_status: u16,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            error_status: default_error_status(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl BindingConfig {
    /// Binder settings; an invalid status falls back to 400.
    pub fn bind_config(&self) -> BindConfig {
        BindConfig {
            error_status: StatusCode::from_u16(self.error_status).unwrap_or(StatusCode::BAD_REQUEST),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

fn default_error_status() -> u16 {
    400
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default renderer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenderingConfig {
    /// Indent JSON responses.
    #[serde(default)]
    pub pretty_json: bool,
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
    /// One plain line per event.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directives; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Subscriber settings for [`daedalus_telemetry::init_logging`].
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            filter: self.level.clone(),
            output: match self.format {
                LogFormat::Json => LogOutput::Json,
                LogFormat::Pretty => LogOutput::Pretty,
                LogFormat::Compact => LogOutput::Compact,
            },
            location: self.include_location,
            ansi: self.ansi_enabled,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
