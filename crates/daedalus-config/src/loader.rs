//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: presets, files, and environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{ConfigError, ConfigResult, DaedalusConfig, LogFormat};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values or a preset
/// 2. Configuration files and strings (TOML or JSON), in the order given
/// 3. Environment variables
///
/// A file only overrides the keys it names; everything else keeps the value
/// of the layer below.
///
/// # Example
///
/// ```no_run
/// use daedalus_config::ConfigLoader;
///
/// # fn main() -> Result<(), daedalus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_development()
///     .with_file("daedalus.toml")?
///     .with_env_prefix("DAEDALUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DaedalusConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DaedalusConfig::default(),
            env_prefix: None,
        }
    }

    /// Start over from default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = DaedalusConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = DaedalusConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = DaedalusConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The file contains invalid TOML/JSON or unknown fields
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.with_string(&content, format)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `format` ("toml" or "json").
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unknown or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [openapi]
    ///     title = "Fruit Market"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.openapi.title, "Fruit Market");
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> ConfigResult<Self> {
        let layer: Value = match format.to_lowercase().as_str() {
            "toml" => {
                // Parse into the typed config first so unknown keys fail with
                // a TOML error pointing at the offending line.
                toml::from_str::<DaedalusConfig>(content)?;
                serde_json::to_value(toml::from_str::<toml::Value>(content)?)?
            }
            "json" => {
                serde_json::from_str::<DaedalusConfig>(content)?;
                serde_json::from_str(content)?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`.
    /// For example, with prefix "DAEDALUS":
    /// - `DAEDALUS__SERVER__HTTP_ADDR=0.0.0.0:9000`
    /// - `DAEDALUS__BINDING__ERROR_STATUS=422`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory or its parents, if
    /// there is one.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();
        self
    }

    /// Load variables from a specific `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable does not parse or
    /// validation fails.
    pub fn load(mut self) -> ConfigResult<DaedalusConfig> {
        if let Some(prefix) = self.env_prefix.take() {
            let marker = format!("{prefix}__");
            let vars: BTreeMap<String, String> = env::vars()
                .filter(|(k, _)| k.starts_with(&marker))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> DaedalusConfig {
        self.config
    }

    /// Applies one `PREFIX__SECTION__KEY` variable. Keys the configuration
    /// does not know are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] if the key lacks the prefix or
    /// the value does not parse as the field's type.
    pub fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> ConfigResult<()> {
        let rest = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            // Server section
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_number(key, value)?;
            }
            // Document section
            ["OPENAPI", "ENABLED"] => config.openapi.enabled = parse_flag(key, value)?,
            ["OPENAPI", "TITLE"] => config.openapi.title = value.to_string(),
            ["OPENAPI", "VERSION"] => config.openapi.version = value.to_string(),
            ["OPENAPI", "DESCRIPTION"] => config.openapi.description = value.to_string(),
            ["OPENAPI", "JSON_PATH"] => config.openapi.json_path = value.to_string(),
            ["OPENAPI", "YAML_PATH"] => config.openapi.yaml_path = value.to_string(),
            ["OPENAPI", "NEGOTIATED_PATH"] => config.openapi.negotiated_path = value.to_string(),
            ["OPENAPI", "SWAGGER_PATH"] => config.openapi.swagger_path = value.to_string(),
            ["OPENAPI", "DEFAULT_ERROR_RESPONSES"] => {
                config.openapi.default_error_responses = parse_flag(key, value)?;
            }
            // Binding and rendering
            ["BINDING", "ERROR_STATUS"] => config.binding.error_status = parse_number(key, value)?,
            ["BINDING", "MAX_BODY_BYTES"] => {
                config.binding.max_body_bytes = parse_number(key, value)?;
            }
            ["RENDERING", "PRETTY_JSON"] => config.rendering.pretty_json = parse_flag(key, value)?,
            // Logging section
            ["LOGGING", "ENABLED"] => config.logging.enabled = parse_flag(key, value)?,
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    "compact" => LogFormat::Compact,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json', 'pretty' or 'compact'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => config.logging.ansi_enabled = parse_flag(key, value)?,
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = parse_flag(key, value)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Overlays `layer` onto `base`, recursing into tables.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, DaedalusConfig::default());
    }

    #[test]
    fn test_loader_with_presets() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);

        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.openapi.swagger_path.is_empty());
    }

    #[test]
    fn test_string_layers_keep_unnamed_keys() {
        let config = ConfigLoader::new()
            .with_development()
            .with_string(r#"{"binding": {"error_status": 422}}"#, "json")
            .unwrap()
            .with_string("[logging]\nformat = \"json\"", "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.binding.error_status, 422);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
        assert!(config.rendering.pretty_json);
    }

    #[test]
    fn test_unknown_fields_fail() {
        let err = ConfigLoader::new()
            .with_string("[server]\nport = 80", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));

        let err = ConfigLoader::new()
            .with_string(r#"{"metrics": {}}"#, "json")
            .unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let err = ConfigLoader::new().with_string("a: 1", "ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(f) if f == "ini"));
    }

    #[test]
    fn test_apply_env_var() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("APP__SERVER__HTTP_ADDR", "127.0.0.1:9000", "APP")
            .unwrap();
        loader
            .apply_env_var("APP__BINDING__ERROR_STATUS", "422", "APP")
            .unwrap();
        loader
            .apply_env_var("APP__OPENAPI__SWAGGER_PATH", "", "APP")
            .unwrap();
        loader
            .apply_env_var("APP__RENDERING__PRETTY_JSON", "yes", "APP")
            .unwrap();
        loader
            .apply_env_var("APP__LOGGING__FORMAT", "Pretty", "APP")
            .unwrap();
        loader
            .apply_env_var("APP__SOMETHING__ELSE", "ignored", "APP")
            .unwrap();

        let config = loader.load_unvalidated();
        assert_eq!(config.server.http_addr, "127.0.0.1:9000");
        assert_eq!(config.binding.error_status, 422);
        assert!(config.openapi.swagger_path.is_empty());
        assert!(config.rendering.pretty_json);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_apply_env_var_parse_errors() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_var("APP__SERVER__REQUEST_TIMEOUT_MS", "soon", "APP")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));

        assert!(loader
            .apply_env_var("APP__OPENAPI__ENABLED", "maybe", "APP")
            .is_err());
        assert!(loader
            .apply_env_var("APPSERVER__HTTP_ADDR", "x", "APP")
            .is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = json!({"a": {"b": 1, "c": 2}, "d": 3});
        merge(&mut base, json!({"a": {"c": 5}, "e": 6}));
        assert_eq!(base, json!({"a": {"b": 1, "c": 5}, "d": 3, "e": 6}));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("perhaps"), None);
    }
}
