//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A dotted key had no value
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    /// A loaded value failed a validation rule
    #[error("Invalid configuration for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Failed to deserialize configuration: {0}")]
    Deserialization(String),

    #[error("Failed to load .env file: {0}")]
    Dotenv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
