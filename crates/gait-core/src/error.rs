//! Error types for gait

use thiserror::Error;

/// The main error type for gait operations
#[derive(Debug, Error)]
pub enum GaitError {
    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("State not registered: {0}")]
    StateNotRegistered(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for gait operations
pub type Result<T> = std::result::Result<T, GaitError>;

impl From<toml::de::Error> for GaitError {
    fn from(err: toml::de::Error) -> Self {
        GaitError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_payload() {
        let err = GaitError::ClipNotFound("walk".to_string());
        assert_eq!(err.to_string(), "Clip not found: walk");
    }

    #[test]
    fn toml_errors_convert() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("key = ");
        let err: GaitError = parsed.unwrap_err().into();
        assert!(matches!(err, GaitError::TomlParseError(_)));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GaitError = io.into();
        assert!(matches!(err, GaitError::IoError(_)));
    }
}
