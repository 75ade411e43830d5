//! Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    /// Detect the format from a path's extension
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        Self::from_extension(ext).ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))
    }
}

/// Reads a configuration file into a JSON tree
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load configuration from file; the root must be a table/object.
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        self.parse(&content, &path.display().to_string())
    }

    /// Parse configuration from a string
    pub fn parse(&self, content: &str, source_name: &str) -> Result<Value> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| {
                ConfigError::Parse {
                    source_name: source_name.to_string(),
                    message: e.to_string(),
                }
            })?,
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
                    source_name: source_name.to_string(),
                    message: e.to_string(),
                })?;
                serde_json::to_value(table).map_err(|e| ConfigError::Parse {
                    source_name: source_name.to_string(),
                    message: e.to_string(),
                })?
            }
        };

        if !value.is_object() {
            return Err(ConfigError::Parse {
                source_name: source_name.to_string(),
                message: "top level must be a table".to_string(),
            });
        }
        Ok(value)
    }
}
