//! Typed configuration for Daedalus services.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (preset → files → env)
//!
//! # Overview
//!
//! [`DaedalusConfig`] holds every section:
//!
//! - [`ServerConfig`] - listener address and timeouts
//! - [`OpenApiConfig`] - document metadata and the paths it is served at
//! - [`BindingConfig`] - default binder error status and body limit
//! - [`RenderingConfig`] - default renderer output
//! - [`LoggingConfig`] - log level and format
//!
//! Each section converts into the settings type of the crate that consumes
//! it, and [`DaedalusConfig::registry_config`] gathers what a
//! [`Registry`](daedalus_core::Registry) needs.
//!
//! # Example
//!
//! ```no_run
//! use daedalus_config::ConfigLoader;
//!
//! # fn main() -> Result<(), daedalus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("daedalus.toml")?
//!     .with_env_prefix("DAEDALUS")
//!     .load()?;
//!
//! println!("Server will listen on: {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [openapi]
//! title = "Fruit Market"
//! version = "1.0.0"
//! json_path = "/openapi.json"
//! yaml_path = "/openapi.yaml"
//! negotiated_path = "/openapi"
//! swagger_path = "/swagger"
//!
//! [binding]
//! error_status = 422
//! max_body_bytes = 1048576
//!
//! [rendering]
//! pretty_json = false
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form
//! `PREFIX__SECTION__KEY`, for example `DAEDALUS__BINDING__ERROR_STATUS=422`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{DaedalusConfig, DaedalusConfigBuilder};
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{
    BindingConfig, LogFormat, LoggingConfig, OpenApiConfig, RenderingConfig, ServerConfig,
};
