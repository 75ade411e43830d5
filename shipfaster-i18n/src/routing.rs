//! Shared locale routing configuration
//!
//! [`RoutingConfig`] is the deserializable description (locales, prefix
//! policy, pathname map). [`LocaleRouting`] is its validated, compiled form,
//! shared by [`LocaleMiddleware`](crate::LocaleMiddleware) and
//! [`Navigation`](crate::Navigation).

use crate::locale::{Locale, negotiate_locale, parse_accept_language};
use crate::pathnames::{PathnameTable, Pathnames};
use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// When the locale appears as the first path segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalePrefix {
    /// Every URL carries the locale
    #[default]
    Always,
    /// The default locale is served without a prefix
    AsNeeded,
    /// URLs never carry the locale
    Never,
}

impl LocalePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalePrefix::Always => "always",
            LocalePrefix::AsNeeded => "as-needed",
            LocalePrefix::Never => "never",
        }
    }
}

/// Locale routing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Supported locale codes, in display order
    pub locales: Vec<String>,
    pub default_locale: String,
    pub locale_prefix: LocalePrefix,
    /// Use cookie and Accept-Language when the path has no locale
    pub locale_detection: bool,
    pub locale_cookie: String,
    /// Emit a `Link` header with hreflang alternates
    pub alternate_links: bool,
    /// Path prefixes the middleware leaves alone
    pub excluded_prefixes: Vec<String>,
    pub pathnames: Pathnames,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string()],
            default_locale: "en".to_string(),
            locale_prefix: LocalePrefix::Always,
            locale_detection: true,
            locale_cookie: "NEXT_LOCALE".to_string(),
            alternate_links: true,
            excluded_prefixes: vec!["/api".to_string(), "/_next".to_string(), "/_vercel".to_string()],
            pathnames: Pathnames::default(),
        }
    }
}

impl RoutingConfig {
    pub fn new<I, S>(locales: I, default_locale: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            default_locale: default_locale.into(),
            ..Self::default()
        }
    }

    pub fn with_locale_prefix(mut self, prefix: LocalePrefix) -> Self {
        self.locale_prefix = prefix;
        self
    }

    pub fn with_locale_detection(mut self, enabled: bool) -> Self {
        self.locale_detection = enabled;
        self
    }

    pub fn with_alternate_links(mut self, enabled: bool) -> Self {
        self.alternate_links = enabled;
        self
    }

    pub fn with_pathnames(mut self, pathnames: Pathnames) -> Self {
        self.pathnames = pathnames;
        self
    }

    /// Check locales and compile the pathname table.
    pub fn validate(&self) -> Result<PathnameTable> {
        if self.locales.is_empty() {
            return Err(I18nError::InvalidConfig("at least one locale is required".into()));
        }

        let mut seen = HashSet::new();
        for code in &self.locales {
            Locale::parse(code)?;
            if !seen.insert(code.to_lowercase()) {
                return Err(I18nError::InvalidConfig(format!("duplicate locale '{}'", code)));
            }
        }

        if !self.locales.contains(&self.default_locale) {
            return Err(I18nError::InvalidConfig(format!(
                "default locale '{}' is not one of {:?}",
                self.default_locale, self.locales
            )));
        }

        if self.locale_cookie.is_empty()
            || !self
                .locale_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(I18nError::InvalidConfig(format!(
                "invalid locale cookie name '{}'",
                self.locale_cookie
            )));
        }

        if let Some(bad) = self.excluded_prefixes.iter().find(|p| !p.starts_with('/')) {
            return Err(I18nError::InvalidConfig(format!(
                "excluded prefix '{}' must start with '/'",
                bad
            )));
        }

        PathnameTable::build(&self.pathnames, &self.locales)
    }
}

/// Validated routing configuration with its compiled pathname table
#[derive(Debug, Clone)]
pub struct LocaleRouting {
    config: RoutingConfig,
    table: PathnameTable,
    parsed: Vec<Locale>,
}

impl LocaleRouting {
    pub fn new(config: RoutingConfig) -> Result<Self> {
        let table = config.validate()?;
        let parsed = config
            .locales
            .iter()
            .map(|code| Locale::parse(code))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            locales = ?config.locales,
            default_locale = %config.default_locale,
            locale_prefix = config.locale_prefix.as_str(),
            pathnames = table.entries().len(),
            "Locale routing configured"
        );

        Ok(Self {
            config,
            table,
            parsed,
        })
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn table(&self) -> &PathnameTable {
        &self.table
    }

    pub fn locales(&self) -> &[String] {
        &self.config.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    /// Configured locale matching `code` case-insensitively
    pub fn find_locale(&self, code: &str) -> Option<&str> {
        self.config
            .locales
            .iter()
            .find(|l| l.eq_ignore_ascii_case(code))
            .map(String::as_str)
    }

    /// Configured locale for `code`, or the default locale
    pub fn locale_or_default(&self, code: &str) -> &str {
        self.find_locale(code).unwrap_or(&self.config.default_locale)
    }

    /// Split a leading locale segment off a path.
    ///
    /// Returns the configured locale and the remaining path (`/` when empty).
    pub fn split_locale<'a>(&self, path: &'a str) -> Option<(&str, &'a str)> {
        let body = path.strip_prefix('/')?;
        let (first, rest) = match body.find('/') {
            Some(i) => (&body[..i], &body[i..]),
            None => (body, "/"),
        };
        let locale = self.find_locale(first)?;
        Some((locale, if rest.is_empty() { "/" } else { rest }))
    }

    /// Best configured locale for an Accept-Language header
    pub fn negotiate(&self, accept_language: &str) -> Option<&str> {
        let requested = parse_accept_language(accept_language);
        let best = negotiate_locale(&requested, &self.parsed)?;
        self.parsed
            .iter()
            .position(|l| l == best)
            .map(|i| self.config.locales[i].as_str())
    }

    /// Whether the middleware should leave `path` untouched
    pub fn is_excluded(&self, path: &str) -> bool {
        let excluded = self.config.excluded_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });

        // Static files: the last segment carries an extension and no page claims the path
        excluded
            || (path.rsplit('/').next().is_some_and(|last| last.contains('.'))
                && !self.is_page_path(path))
    }

    /// Whether a path, with or without its locale prefix, matches a pathname entry
    pub fn is_page_path(&self, path: &str) -> bool {
        let trimmed = path.trim_end_matches('/');
        let rest = match self.split_locale(trimmed) {
            Some((_, rest)) => rest,
            None => trimmed,
        };

        self.table.match_canonical(rest).is_some()
            || self
                .config
                .locales
                .iter()
                .any(|locale| self.table.match_localized(locale, rest).is_some())
    }

    /// Whether URLs for `locale` carry a prefix under the current policy
    pub fn is_prefixed(&self, locale: &str) -> bool {
        match self.config.locale_prefix {
            LocalePrefix::Always => true,
            LocalePrefix::AsNeeded => locale != self.config.default_locale,
            LocalePrefix::Never => false,
        }
    }

    /// Browser-facing path for a localized path in `locale`
    pub fn external_path(&self, locale: &str, localized: &str) -> String {
        if self.is_prefixed(locale) {
            prefixed(locale, localized)
        } else {
            localized.to_string()
        }
    }
}

/// `/{locale}` joined with a path; the root maps to the bare prefix
pub fn prefixed(locale: &str, path: &str) -> String {
    if path == "/" || path.is_empty() {
        format!("/{}", locale)
    } else {
        format!("/{}{}", locale, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routing(prefix: LocalePrefix) -> LocaleRouting {
        LocaleRouting::new(
            RoutingConfig::new(["en", "zh", "de", "pt-BR"], "en").with_locale_prefix(prefix),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_rejects_bad_locales() {
        assert!(RoutingConfig::new(Vec::<String>::new(), "en").validate().is_err());
        assert!(RoutingConfig::new(["en", "EN"], "en").validate().is_err());
        assert!(RoutingConfig::new(["en", "english"], "en").validate().is_err());
        assert!(RoutingConfig::new(["en", "de"], "fr").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cookie_and_prefixes() {
        let mut config = RoutingConfig::new(["en"], "en");
        config.locale_cookie = "bad cookie".into();
        assert!(config.validate().is_err());

        let mut config = RoutingConfig::new(["en"], "en");
        config.excluded_prefixes = vec!["api".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_locale() {
        let routing = routing(LocalePrefix::Always);
        assert_eq!(routing.split_locale("/de/explore"), Some(("de", "/explore")));
        assert_eq!(routing.split_locale("/DE"), Some(("de", "/")));
        assert_eq!(routing.split_locale("/pt-br/ai/x"), Some(("pt-BR", "/ai/x")));
        assert_eq!(routing.split_locale("/deutsch/explore"), None);
        assert_eq!(routing.split_locale("/"), None);
    }

    #[test]
    fn test_negotiate() {
        let routing = routing(LocalePrefix::Always);
        assert_eq!(routing.negotiate("zh-CN,zh;q=0.9"), Some("zh"));
        assert_eq!(routing.negotiate("pt-br"), Some("pt-BR"));
        assert_eq!(routing.negotiate("ko"), None);
    }

    #[test]
    fn test_exclusions() {
        let routing = routing(LocalePrefix::Always);
        assert!(routing.is_excluded("/api"));
        assert!(routing.is_excluded("/api/health"));
        assert!(routing.is_excluded("/_next/static/chunk"));
        assert!(routing.is_excluded("/_vercel/insights/script.js"));
        assert!(routing.is_excluded("/_vercel"));
        assert!(routing.is_excluded("/favicon.svg"));
        assert!(routing.is_excluded("/en/images/logo.png"));
        assert!(!routing.is_excluded("/apis"));
        assert!(!routing.is_excluded("/en/explore"));
    }

    #[test]
    fn test_dotted_page_paths_are_not_static_files() {
        let pathnames = Pathnames::new()
            .shared("/", "/")
            .shared("/ai/[websiteName]", "/ai/[websiteName]");
        let routing = LocaleRouting::new(RoutingConfig::new(["en", "de"], "en").with_pathnames(pathnames))
            .unwrap();

        assert!(routing.is_page_path("/ai/gpt-4.5"));
        assert!(routing.is_page_path("/DE/ai/gpt-4.5/"));
        assert!(!routing.is_excluded("/ai/gpt-4.5"));
        assert!(!routing.is_excluded("/en/ai/gpt-4.5"));
        assert!(routing.is_excluded("/favicon.svg"));
        assert!(routing.is_excluded("/en/ai/gpt-4.5/logo.png"));
    }

    #[test]
    fn test_external_path_by_policy() {
        assert_eq!(routing(LocalePrefix::Always).external_path("en", "/"), "/en");
        assert_eq!(routing(LocalePrefix::AsNeeded).external_path("en", "/explore"), "/explore");
        assert_eq!(routing(LocalePrefix::AsNeeded).external_path("de", "/explore"), "/de/explore");
        assert_eq!(routing(LocalePrefix::Never).external_path("de", "/explore"), "/explore");
    }

    #[test]
    fn test_config_deserializes_kebab_prefix() {
        let config: RoutingConfig =
            serde_json::from_str(r#"{"locales": ["en", "de"], "locale_prefix": "as-needed"}"#).unwrap();
        assert_eq!(config.locale_prefix, LocalePrefix::AsNeeded);
        assert_eq!(config.locale_cookie, "NEXT_LOCALE");
        assert!(config.validate().is_ok());
    }
}
