//! Error types for layout rendering

use thiserror::Error;

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur while registering or rendering templates
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template rendering error: {0}")]
    Render(String),

    /// Template source failed to parse
    #[error("Template parsing error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<handlebars::RenderError> for LayoutError {
    fn from(err: handlebars::RenderError) -> Self {
        LayoutError::Render(err.to_string())
    }
}

impl From<handlebars::TemplateError> for LayoutError {
    fn from(err: handlebars::TemplateError) -> Self {
        LayoutError::Parse(err.to_string())
    }
}

impl From<LayoutError> for shipfaster_core::Error {
    fn from(err: LayoutError) -> Self {
        shipfaster_core::Error::Render(err.to_string())
    }
}
