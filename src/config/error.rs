//! Configuration errors

use std::path::PathBuf;

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Errors raised while loading or validating pipeline configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to build configuration: {0}")]
    Build(#[source] config::ConfigError),

    #[error("Failed to deserialize configuration: {0}")]
    Deserialization(#[source] config::ConfigError),
}

impl ConfigurationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
