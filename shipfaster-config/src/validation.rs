//! Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating a deserialized configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty or whitespace
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::validation(field, "cannot be empty"));
        }
        Ok(())
    }

    /// Validate that a list has at least one entry
    pub fn non_empty_list<T>(values: &[T], field: &str) -> Result<()> {
        if values.is_empty() {
            return Err(ConfigError::validation(field, "must list at least one entry"));
        }
        Ok(())
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of<T: PartialEq + std::fmt::Debug>(value: &T, allowed: &[T], field: &str) -> Result<()> {
        if !allowed.contains(value) {
            return Err(ConfigError::validation(
                field,
                format!("{:?} must be one of {:?}", value, allowed),
            ));
        }
        Ok(())
    }

    /// Validate an absolute http(s) URL
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        let rest = value
            .strip_prefix("https://")
            .or_else(|| value.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
            _ => Err(ConfigError::validation(field, format!("'{}' is not an http(s) URL", value))),
        }
    }

    /// Validate a site-relative path or an absolute URL
    pub fn is_path_or_url(value: &str, field: &str) -> Result<()> {
        if value.starts_with('/') {
            return Ok(());
        }
        Self::is_url(value, field)
    }

    /// Validate port number
    pub fn is_port(value: u16, field: &str) -> Result<()> {
        if value == 0 {
            return Err(ConfigError::validation(field, "must be a valid port number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("  ", "field").is_err());
    }

    #[test]
    fn test_non_empty_list() {
        assert!(ConfigValidator::non_empty_list(&["en"], "locales").is_ok());
        assert!(ConfigValidator::non_empty_list::<&str>(&[], "locales").is_err());
    }

    #[test]
    fn test_one_of_validation() {
        let allowed = ["always", "as-needed", "never"];
        assert!(ConfigValidator::one_of(&"always", &allowed, "prefix").is_ok());
        assert!(ConfigValidator::one_of(&"sometimes", &allowed, "prefix").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(ConfigValidator::is_url("https://shipfaster.online", "url").is_ok());
        assert!(ConfigValidator::is_url("http://localhost:3000", "url").is_ok());
        assert!(ConfigValidator::is_url("shipfaster.online", "url").is_err());
        assert!(ConfigValidator::is_url("https://", "url").is_err());
    }

    #[test]
    fn test_path_or_url() {
        assert!(ConfigValidator::is_path_or_url("/favicon.svg", "icon").is_ok());
        assert!(ConfigValidator::is_path_or_url("https://cdn.example/x.png", "icon").is_ok());
        assert!(ConfigValidator::is_path_or_url("favicon.svg", "icon").is_err());
    }

    #[test]
    fn test_port_validation() {
        assert!(ConfigValidator::is_port(3000, "port").is_ok());
        assert!(ConfigValidator::is_port(0, "port").is_err());
    }
}
