//! Environment variable loading
//!
//! Variables named `{PREFIX}_{SECTION}__{KEY}` map to the nested key
//! `section.key`. Values that parse as JSON (numbers, booleans, arrays)
//! keep their type, anything else stays a string.

use serde_json::Value;
use std::env;

/// One environment override: nested key path plus typed value
#[derive(Debug, Clone, PartialEq)]
pub struct EnvOverride {
    pub path: Vec<String>,
    pub value: Value,
}

/// Environment variable loader
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
    separator: String,
}

impl EnvLoader {
    /// Create a loader for variables starting with `{prefix}_`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('_').to_uppercase(),
            separator: "__".to_string(),
        }
    }

    /// Use a different nesting separator (default `__`)
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Collect overrides from the process environment
    pub fn load(&self) -> Vec<EnvOverride> {
        self.load_from(env::vars())
    }

    /// Collect overrides from an arbitrary variable source
    pub fn load_from<I>(&self, vars: I) -> Vec<EnvOverride>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let head = format!("{}_", self.prefix);
        let mut overrides: Vec<EnvOverride> = vars
            .into_iter()
            .filter_map(|(key, raw)| {
                let rest = key.strip_prefix(&head)?;
                let path: Vec<String> = rest
                    .split(self.separator.as_str())
                    .map(|part| part.to_lowercase())
                    .collect();
                if path.iter().any(|part| part.is_empty()) {
                    return None;
                }
                Some(EnvOverride {
                    path,
                    value: parse_value(&raw),
                })
            })
            .collect();

        // Deterministic application order regardless of env ordering
        overrides.sort_by(|a, b| a.path.cmp(&b.path));
        overrides
    }
}

fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Array(_) | Value::Object(_))) => {
            value
        }
        _ => Value::String(raw.to_string()),
    }
}
