// Startup and request errors for the site binary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] shipfaster_config::ConfigError),

    #[error("Logging error: {0}")]
    Log(#[from] shipfaster_log::LogError),

    #[error("I18n error: {0}")]
    I18n(#[from] shipfaster_i18n::I18nError),

    #[error("Layout error: {0}")]
    Layout(#[from] shipfaster_layout::LayoutError),

    #[error(transparent)]
    Http(#[from] shipfaster_core::Error),
}

impl From<AppError> for shipfaster_core::Error {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Http(inner) => inner,
            AppError::Layout(inner) => inner.into(),
            AppError::I18n(shipfaster_i18n::I18nError::UnknownLocale(locale)) => {
                shipfaster_core::Error::NotFound(format!("locale {}", locale))
            }
            other => shipfaster_core::Error::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
