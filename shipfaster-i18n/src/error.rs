//! Error types for i18n operations

use thiserror::Error;

/// Errors that can occur while configuring or using locale routing.
#[derive(Debug, Error)]
pub enum I18nError {
    /// String is not a BCP 47 language tag
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Locale is well-formed but not configured
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Pathname template failed to parse or validate
    #[error("Invalid pathname '{template}': {reason}")]
    InvalidPathname { template: String, reason: String },

    /// Template was compiled without a value for one of its parameters
    #[error("Missing parameter '{param}' for pathname '{template}'")]
    MissingParam { template: String, param: String },

    /// Routing configuration is inconsistent
    #[error("Invalid routing configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse message file
    #[error("Failed to parse message file: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl I18nError {
    pub(crate) fn pathname(template: impl Into<String>, reason: impl Into<String>) -> Self {
        I18nError::InvalidPathname {
            template: template.into(),
            reason: reason.into(),
        }
    }
}
