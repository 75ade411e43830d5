//! Site configuration
//!
//! Layers, later winning: built-in defaults, `shipfaster.toml` (or the file
//! named by `SHIPFASTER_CONFIG`), `.env`, then `SHIPFASTER_*` variables with
//! `__` as the nesting separator (`SHIPFASTER_SERVER__PORT=8080`).

use serde::{Deserialize, Serialize};
use shipfaster_config::{ConfigError, ConfigManager, ConfigValidator, Validate};
use shipfaster_i18n::{Pathnames, RoutingConfig};
use shipfaster_layout::{LayoutConfig, Metadata};
use shipfaster_log::LogConfig;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SHIPFASTER";

/// Variable naming an alternative configuration file
pub const CONFIG_PATH_VAR: &str = "SHIPFASTER_CONFIG";

pub const DEFAULT_CONFIG_FILE: &str = "shipfaster.toml";

/// Locales the site is translated into, in switcher order
pub const LOCALES: [&str; 8] = ["en", "zh", "ja", "de", "fr", "es", "pt", "ru"];

pub const DEFAULT_LOCALE: &str = "en";

/// The site's route table; every route is shared across locales.
pub fn site_pathnames() -> Pathnames {
    Pathnames::new()
        .shared("/", "/")
        .shared("/explore", "/explore")
        .shared("/submit", "/submit")
        .shared("/startup", "/startup")
        .shared("/ai/[websiteName]", "/ai/[websiteName]")
        .shared("/category/[code]", "/category/[code]")
}

/// Routing settings for the site's locales and pathnames
pub fn site_routing() -> RoutingConfig {
    RoutingConfig::new(LOCALES, DEFAULT_LOCALE).with_pathnames(site_pathnames())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> shipfaster_config::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::validation("server.host", format!("{}", e)))
    }
}

/// Complete site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub i18n: RoutingConfig,
    pub metadata: Metadata,
    pub layout: LayoutConfig,
    /// Directory of `{locale}.json` message catalogues; optional
    pub messages_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log: LogConfig::from_env(),
            i18n: site_routing(),
            metadata: Metadata::default(),
            layout: LayoutConfig::default(),
            messages_dir: Some(PathBuf::from("messages")),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> shipfaster_config::Result<()> {
        ConfigValidator::not_empty(&self.server.host, "server.host")?;
        ConfigValidator::is_port(self.server.port, "server.port")?;
        self.server.socket_addr()?;

        ConfigValidator::non_empty_list(&self.i18n.locales, "i18n.locales")?;
        ConfigValidator::not_empty(&self.i18n.locale_cookie, "i18n.locale_cookie")?;
        self.i18n
            .validate()
            .map_err(|e| ConfigError::validation("i18n", e.to_string()))?;

        ConfigValidator::not_empty(&self.metadata.title, "metadata.title")?;
        ConfigValidator::is_url(&self.metadata.open_graph.url, "metadata.open_graph.url")?;
        for icon in &self.metadata.icons {
            ConfigValidator::is_path_or_url(&icon.url, "metadata.icons")?;
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load from the default file location and the process environment
    pub fn load() -> shipfaster_config::Result<Self> {
        let manager = ConfigManager::new(ENV_PREFIX).with_defaults(&Self::default())?;

        manager.load_dotenv(None)?;
        match env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                info!(path = %path, "Loading configuration file");
                manager.load_file(&path)?;
            }
            Err(_) => {
                if manager.load_file_if_exists(DEFAULT_CONFIG_FILE)? {
                    info!(path = DEFAULT_CONFIG_FILE, "Loaded configuration file");
                }
            }
        }

        let applied = manager.load_env();
        debug!(overrides = applied, "Applied environment overrides");
        manager.load_validated()
    }

    /// Load from an explicit file and variable list, leaving the process
    /// environment alone
    pub fn load_from<I>(file: Option<&Path>, vars: I) -> shipfaster_config::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let manager = ConfigManager::new(ENV_PREFIX).with_defaults(&Self::default())?;
        if let Some(file) = file {
            manager.load_file(file)?;
        }
        manager.load_env_from(vars);
        manager.load_validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipfaster_i18n::LocalePrefix;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::load_from(None, Vec::new()).unwrap();
        assert_eq!(config.i18n.locales, LOCALES.to_vec());
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.i18n.locale_prefix, LocalePrefix::Always);
        assert_eq!(config.i18n.pathnames.len(), 6);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.metadata.title, "Shipfaster AI");
    }

    #[test]
    fn test_file_and_env_layers() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[i18n]
locales = ["en", "de"]
locale_prefix = "as-needed"

[layout.ads]
client_id = "ca-pub-1"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(
            Some(file.path()),
            vars(&[("SHIPFASTER_SERVER__HOST", "0.0.0.0")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.i18n.locales, vec!["en", "de"]);
        assert_eq!(config.i18n.locale_prefix, LocalePrefix::AsNeeded);
        assert_eq!(config.layout.ads.unwrap().client_id, "ca-pub-1");
        // untouched sections keep their defaults
        assert_eq!(config.i18n.pathnames.len(), 6);
    }

    #[test]
    fn test_default_locale_must_be_listed() {
        let result = AppConfig::load_from(None, vars(&[("SHIPFASTER_I18N__DEFAULT_LOCALE", "it")]));
        assert!(matches!(result, Err(ConfigError::Validation { ref field, .. }) if field == "i18n"));
    }

    #[test]
    fn test_empty_measurement_id_is_accepted() {
        let config = AppConfig::load_from(
            None,
            vars(&[("SHIPFASTER_LAYOUT__ANALYTICS__MEASUREMENT_ID", "")]),
        )
        .unwrap();
        assert_eq!(config.layout.analytics.unwrap().measurement_id, "");
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = AppConfig::load_from(None, vars(&[("SHIPFASTER_SERVER__PORT", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 3000);
    }
}
