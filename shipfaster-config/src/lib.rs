//! Configuration management for the Shipfaster site
//!
//! Configuration is a JSON tree assembled from layers, later layers winning:
//!
//! 1. serialized defaults (`ConfigManager::with_defaults`)
//! 2. a TOML or JSON file
//! 3. a `.env` file, folded into the process environment
//! 4. prefixed environment variables (`SHIPFASTER_SERVER__PORT=8080`)
//!
//! The merged tree is then deserialized into a typed struct and validated.
//!
//! ```no_run
//! use serde::Deserialize;
//! use shipfaster_config::{ConfigManager, Validate, Result};
//!
//! #[derive(Deserialize)]
//! struct Server { port: u16 }
//!
//! impl Validate for Server {
//!     fn validate(&self) -> Result<()> { Ok(()) }
//! }
//!
//! let manager = ConfigManager::new("SHIPFASTER");
//! manager.load_file("shipfaster.toml")?;
//! manager.load_env();
//! let server: Server = manager.get("server")?;
//! # Ok::<(), shipfaster_config::ConfigError>(())
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::{EnvLoader, EnvOverride};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Layered configuration store
#[derive(Clone)]
pub struct ConfigManager {
    root: Arc<RwLock<Value>>,
    env: EnvLoader,
}

impl ConfigManager {
    /// Create an empty manager reading `{prefix}_*` environment variables
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            root: Arc::new(RwLock::new(Value::Object(Map::new()))),
            env: EnvLoader::new(prefix),
        }
    }

    /// Seed the tree with serialized defaults
    pub fn with_defaults<T: Serialize>(self, defaults: &T) -> Result<Self> {
        let value = serde_json::to_value(defaults)
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        self.merge_value(value);
        Ok(self)
    }

    /// Merge a configuration file; format is taken from the extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loader = ConfigLoader::new(FileFormat::detect(path)?);
        let value = loader.load_file(path)?;
        debug!(path = %path.display(), "Loaded configuration file");
        self.merge_value(value);
        Ok(())
    }

    /// Merge a configuration file when it exists; returns whether it did
    pub fn load_file_if_exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "Configuration file absent, skipping");
            return Ok(false);
        }
        self.load_file(path)?;
        Ok(true)
    }

    /// Fold a `.env` file into the process environment.
    ///
    /// With no path, a missing `.env` in the working directory is ignored.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::Dotenv(e.to_string()))?;
            }
            None => {
                if let Err(e) = dotenvy::dotenv() {
                    if !e.not_found() {
                        return Err(ConfigError::Dotenv(e.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply prefixed environment variable overrides
    pub fn load_env(&self) -> usize {
        self.apply_overrides(self.env.load())
    }

    /// Apply overrides from an explicit variable list
    pub fn load_env_from<I>(&self, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.apply_overrides(self.env.load_from(vars))
    }

    fn apply_overrides(&self, overrides: Vec<EnvOverride>) -> usize {
        let count = overrides.len();
        let mut root = self.root.write();
        for item in overrides {
            debug!(key = %item.path.join("."), "Applying environment override");
            set_path(&mut root, &item.path, item.value);
        }
        count
    }

    /// Deep-merge a JSON object into the tree
    pub fn merge_value(&self, value: Value) {
        let mut root = self.root.write();
        merge(&mut root, value);
    }

    /// Set a value at a dotted key
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        let path: Vec<String> = key.split('.').map(str::to_string).collect();
        set_path(&mut self.root.write(), &path, value);
        Ok(())
    }

    /// Get a value at a dotted key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let root = self.root.read();
        let value = key
            .split('.')
            .try_fold(&*root, |node, part| node.get(part))
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::Deserialization(format!("{}: {}", key, e)))
    }

    /// Get a value at a dotted key, falling back to `default`
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        let root = self.root.read();
        key.split('.')
            .try_fold(&*root, |node, part| node.get(part))
            .is_some()
    }

    /// Snapshot of the merged tree
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }

    /// Deserialize the whole tree and run its validation rules
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let value = self.snapshot();
        let config: T = serde_json::from_value(value)
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Deep merge: objects merge key by key, anything else replaces.
fn merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Write `value` at `path`, turning scalars along the way into tables.
fn set_path(node: &mut Value, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let slot = map.entry(first.clone()).or_insert(Value::Null);
        set_path(slot, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Settings {
        server: Server,
    }

    impl Validate for Settings {
        fn validate(&self) -> Result<()> {
            ConfigValidator::is_port(self.server.port, "server.port")
        }
    }

    fn defaults() -> Settings {
        Settings {
            server: Server {
                host: "127.0.0.1".into(),
                port: 3000,
            },
        }
    }

    #[test]
    fn test_set_and_get_dotted() {
        let manager = ConfigManager::new("TEST");
        manager.set("server.port", 8080).unwrap();

        let port: u16 = manager.get("server.port").unwrap();
        assert_eq!(port, 8080);
        assert!(manager.has("server"));
        assert!(!manager.has("server.host"));
        assert_eq!(manager.get_or("server.host", "0.0.0.0".to_string()), "0.0.0.0");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();

        let manager = ConfigManager::new("TEST").with_defaults(&defaults()).unwrap();
        manager.load_file(file.path()).unwrap();

        let settings: Settings = manager.load_validated().unwrap();
        assert_eq!(settings.server.port, 4000);
        // Untouched keys keep their default
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides_file() {
        let manager = ConfigManager::new("TEST").with_defaults(&defaults()).unwrap();
        let applied = manager.load_env_from(vec![
            ("TEST_SERVER__PORT".to_string(), "9000".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ]);

        assert_eq!(applied, 1);
        let port: u16 = manager.get("server.port").unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_validation_failure() {
        let manager = ConfigManager::new("TEST").with_defaults(&defaults()).unwrap();
        manager.set("server.port", 0).unwrap();

        let result: Result<Settings> = manager.load_validated();
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_missing_optional_file() {
        let manager = ConfigManager::new("TEST");
        assert!(!manager.load_file_if_exists("/no/such/shipfaster.toml").unwrap());
    }

    #[test]
    fn test_merge_replaces_scalars_and_arrays() {
        let mut target = serde_json::json!({"a": {"b": 1, "c": [1, 2]}});
        merge(&mut target, serde_json::json!({"a": {"c": [3]}}));
        assert_eq!(target, serde_json::json!({"a": {"b": 1, "c": [3]}}));
    }
}
