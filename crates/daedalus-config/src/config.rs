//! Root configuration type.

use std::net::SocketAddr;

use daedalus_core::RegistryConfig;
use serde::{Deserialize, Serialize};

use crate::{
    BindingConfig, ConfigError, ConfigResult, LogFormat, LoggingConfig, OpenApiConfig,
    RenderingConfig, ServerConfig,
};

/// Root configuration of a Daedalus service.
///
/// # Example
///
/// ```
/// use daedalus_config::DaedalusConfig;
///
/// let config = DaedalusConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.openapi.json_path, "/openapi.json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DaedalusConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Document generation and serving.
    #[serde(default)]
    pub openapi: OpenApiConfig,

    /// Default binder settings.
    #[serde(default)]
    pub binding: BindingConfig,

    /// Default renderer settings.
    #[serde(default)]
    pub rendering: RenderingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DaedalusConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::{DaedalusConfig, ServerConfig};
    ///
    /// let config = DaedalusConfig::builder()
    ///     .server(ServerConfig {
    ///         http_addr: "127.0.0.1:3000".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> DaedalusConfigBuilder {
        DaedalusConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field:
    /// an unparsable bind address, a bind error status outside 4xx and 5xx,
    /// a zero body limit, or document paths that are relative or collide.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if !(400..600).contains(&self.binding.error_status) {
            return Err(ConfigError::invalid_value(
                "binding.error_status",
                format!("must be 4xx or 5xx, got {}", self.binding.error_status),
            ));
        }

        if self.binding.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "binding.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.openapi.enabled {
            self.validate_document_paths()?;
        }

        Ok(())
    }

    fn validate_document_paths(&self) -> ConfigResult<()> {
        let openapi = &self.openapi;
        let mut paths = vec![
            ("openapi.json_path", openapi.json_path.as_str()),
            ("openapi.yaml_path", openapi.yaml_path.as_str()),
            ("openapi.negotiated_path", openapi.negotiated_path.as_str()),
        ];
        if !openapi.swagger_path.is_empty() {
            paths.push(("openapi.swagger_path", openapi.swagger_path.as_str()));
        }

        for (i, (field, path)) in paths.iter().enumerate() {
            if !path.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    *field,
                    format!("must start with '/': {path}"),
                ));
            }
            if let Some((other, _)) = paths[..i].iter().find(|(_, p)| p == path) {
                return Err(ConfigError::invalid_value(
                    *field,
                    format!("{path} is already used by {other}"),
                ));
            }
        }
        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations, and indented JSON
    /// responses.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::DaedalusConfig;
    ///
    /// let config = DaedalusConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert!(config.rendering.pretty_json);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config.rendering.pretty_json = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level and compact responses. The Swagger page is
    /// turned off; the JSON and YAML documents stay available.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::{DaedalusConfig, LogFormat};
    ///
    /// let config = DaedalusConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// assert!(config.openapi.swagger_path.is_empty());
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config.rendering.pretty_json = false;
        config.openapi.swagger_path = String::new();

        config
    }

    /// Settings for a [`Registry`](daedalus_core::Registry).
    ///
    /// ```
    /// use daedalus_config::DaedalusConfig;
    /// use daedalus_core::Registry;
    ///
    /// let registry = Registry::new(DaedalusConfig::development().registry_config());
    /// assert_eq!(registry.len(), 0);
    /// ```
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            binding: self.binding.bind_config(),
            pretty_json: self.rendering.pretty_json,
            ..Default::default()
        }
    }
}

/// Builder for [`DaedalusConfig`].
#[derive(Debug, Default)]
pub struct DaedalusConfigBuilder {
    server: Option<ServerConfig>,
    openapi: Option<OpenApiConfig>,
    binding: Option<BindingConfig>,
    rendering: Option<RenderingConfig>,
    logging: Option<LoggingConfig>,
}

impl DaedalusConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the document configuration.
    #[must_use]
    pub fn openapi(mut self, openapi: OpenApiConfig) -> Self {
        self.openapi = Some(openapi);
        self
    }

    /// Set the binder configuration.
    #[must_use]
    pub fn binding(mut self, binding: BindingConfig) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Set the renderer configuration.
    #[must_use]
    pub fn rendering(mut self, rendering: RenderingConfig) -> Self {
        self.rendering = Some(rendering);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> DaedalusConfig {
        DaedalusConfig {
            server: self.server.unwrap_or_default(),
            openapi: self.openapi.unwrap_or_default(),
            binding: self.binding.unwrap_or_default(),
            rendering: self.rendering.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_default_is_valid() {
        assert!(DaedalusConfig::default().validate().is_ok());
        assert!(DaedalusConfig::development().validate().is_ok());
        assert!(DaedalusConfig::production().validate().is_ok());
    }

    #[test]
    fn test_invalid_http_addr() {
        let mut config = DaedalusConfig::default();
        config.server.http_addr = "not-an-address".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_invalid_error_status() {
        let mut config = DaedalusConfig::default();
        config.binding.error_status = 200;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("binding.error_status"));

        config.binding.error_status = 422;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = DaedalusConfig::default();
        config.binding.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_document_paths_must_be_absolute_and_distinct() {
        let mut config = DaedalusConfig::default();
        config.openapi.yaml_path = "openapi.yaml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("openapi.yaml_path"));

        let mut config = DaedalusConfig::default();
        config.openapi.swagger_path = "/openapi".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("openapi.negotiated_path"));

        config.openapi.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_config() {
        let mut config = DaedalusConfig::development();
        config.binding.error_status = 422;
        let registry = config.registry_config();
        assert!(registry.pretty_json);
        assert_eq!(registry.binding.error_status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_builder_fills_missing_sections() {
        let config = DaedalusConfig::builder()
            .rendering(RenderingConfig { pretty_json: true })
            .build();
        assert!(config.rendering.pretty_json);
        assert_eq!(config.openapi, OpenApiConfig::default());
    }
}
