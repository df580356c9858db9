use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuneForgeError {
    #[error("Settings document parse error: {0}")]
    ParseError(String),

    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unknown setting: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: expected {expected}")]
    InvalidValue { field: String, expected: &'static str },
}

impl From<toml::de::Error> for TuneForgeError {
    fn from(err: toml::de::Error) -> Self {
        TuneForgeError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for TuneForgeError {
    fn from(err: toml::ser::Error) -> Self {
        TuneForgeError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TuneForgeError>;
