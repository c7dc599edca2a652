//! Errors raised while loading or validating a [`DaedalusConfig`](crate::DaedalusConfig).

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `with_file` was given a path that does not exist.
    #[error("no configuration file at {path}")]
    FileNotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read configuration file {path}")]
    ReadError {
        /// Requested path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Neither `toml` nor `json`.
    #[error("unsupported configuration format {0:?}, expected toml or json")]
    UnsupportedFormat(String),

    /// Malformed TOML, or TOML naming an unknown section or key.
    #[error("invalid TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Malformed JSON, or JSON naming an unknown section or key.
    #[error("invalid JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An explicitly requested `.env` file could not be loaded.
    #[error("cannot load dotenv file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A value parsed but is out of range, e.g. a non-error bind status.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted field path such as `binding.error_status`
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// An environment override could not be applied.
    #[error("environment override {var}: {reason}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = ConfigError::file_not_found("/etc/daedalus.toml");
        assert_eq!(err.to_string(), "no configuration file at /etc/daedalus.toml");

        let err = ConfigError::invalid_value("binding.error_status", "must be 4xx or 5xx");
        assert_eq!(err.to_string(), "binding.error_status: must be 4xx or 5xx");

        let err = ConfigError::env_parse_error("DAEDALUS__SERVER__REQUEST_TIMEOUT_MS", "not a number");
        assert!(err.to_string().contains("DAEDALUS__SERVER__REQUEST_TIMEOUT_MS"));

        let err = ConfigError::UnsupportedFormat("ini".to_string());
        assert_eq!(
            err.to_string(),
            r#"unsupported configuration format "ini", expected toml or json"#
        );
    }

    #[test]
    fn test_toml_error_converts() {
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }
}
