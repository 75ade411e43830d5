//! Locale-aware navigation helpers
//!
//! [`Navigation`] is bound to the same [`LocaleRouting`] as the middleware,
//! so generated links always agree with what the middleware accepts.
//!
//! ```
//! use std::sync::Arc;
//! use shipfaster_i18n::{LocaleRouting, Navigation, RoutingConfig};
//!
//! let routing = LocaleRouting::new(RoutingConfig::new(["en", "de"], "en")).unwrap();
//! let nav = Navigation::new(Arc::new(routing));
//!
//! assert_eq!(nav.href("/explore?sort=new", "de"), "/de/explore?sort=new");
//! assert_eq!(nav.pathname("/de/explore"), "/explore");
//! ```

use crate::Result;
use crate::routing::LocaleRouting;
use serde::Serialize;
use shipfaster_core::HttpResponse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Anchor data for a locale-aware link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    /// Target locale; `None` for links that stay in the current locale
    pub hreflang: Option<String>,
    pub label: String,
    /// Whether the link points at the current page
    pub active: bool,
}

/// How a router navigation updates browser history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Push,
    Replace,
}

/// A navigation produced by [`LocaleRouter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterAction {
    pub mode: HistoryMode,
    pub href: String,
}

/// Link, redirect and pathname helpers for one routing configuration
#[derive(Debug, Clone)]
pub struct Navigation {
    routing: Arc<LocaleRouting>,
}

impl Navigation {
    pub fn new(routing: Arc<LocaleRouting>) -> Self {
        Self { routing }
    }

    pub fn routing(&self) -> &LocaleRouting {
        &self.routing
    }

    /// Browser href for a canonical pathname in `locale`.
    ///
    /// Query and fragment are kept. External URLs and fragment-only hrefs
    /// are returned unchanged. Unknown locales fall back to the default.
    pub fn href(&self, pathname: &str, locale: &str) -> String {
        if is_external(pathname) {
            return pathname.to_string();
        }

        let (path, suffix) = split_suffix(pathname);
        let locale = self.known_locale(locale);

        let localized = self
            .routing
            .table()
            .match_canonical(path)
            .and_then(|(entry, params)| entry.localized(locale).render(&params).ok())
            .unwrap_or_else(|| path.to_string());

        format!("{}{}", self.routing.external_path(locale, &localized), suffix)
    }

    /// Href for a pathname-map entry filled with plain parameter values
    pub fn href_for(
        &self,
        canonical: &str,
        params: &HashMap<String, String>,
        locale: &str,
    ) -> Result<String> {
        let locale = self.known_locale(locale);
        let localized = self.get_pathname(canonical, params, locale)?;
        Ok(self.routing.external_path(locale, &localized))
    }

    /// Localized pathname (without locale prefix) for a pathname-map entry.
    ///
    /// Parameter values are percent-encoded. Templates missing from the map
    /// are compiled as given.
    pub fn get_pathname(
        &self,
        canonical: &str,
        params: &HashMap<String, String>,
        locale: &str,
    ) -> Result<String> {
        let locale = self.known_locale(locale);
        match self.routing.table().get(canonical) {
            Some(entry) => entry.localized(locale).compile(params),
            None => crate::PathTemplate::parse(canonical)?.compile(params),
        }
    }

    /// Link to a canonical pathname in `locale`
    pub fn link(&self, pathname: &str, locale: &str, label: impl Into<String>) -> Link {
        Link {
            href: self.href(pathname, locale),
            hreflang: None,
            label: label.into(),
            active: false,
        }
    }

    /// 307 redirect to a canonical pathname in `locale`
    pub fn redirect(&self, pathname: &str, locale: &str) -> HttpResponse {
        HttpResponse::temporary_redirect(self.href(pathname, locale))
    }

    /// Request path without its locale prefix or query
    pub fn pathname(&self, request_path: &str) -> String {
        let (path, _) = split_suffix(request_path);
        match self.routing.split_locale(path) {
            Some((_, rest)) => rest.to_string(),
            None => path.to_string(),
        }
    }

    /// Locale named by a request path's prefix, or the default locale
    pub fn locale_of(&self, request_path: &str) -> &str {
        let (path, _) = split_suffix(request_path);
        self.routing
            .split_locale(path)
            .map(|(locale, _)| locale)
            .unwrap_or(self.routing.default_locale())
    }

    /// Router bound to the page currently being rendered
    pub fn router(&self, current_path: &str, locale: &str) -> LocaleRouter {
        LocaleRouter {
            navigation: self.clone(),
            current: current_path.to_string(),
            locale: self.known_locale(locale).to_string(),
        }
    }

    fn known_locale<'a>(&'a self, locale: &'a str) -> &'a str {
        match self.routing.find_locale(locale) {
            Some(found) => found,
            None => {
                warn!(locale, "Unknown locale in navigation, using default");
                self.routing.default_locale()
            }
        }
    }
}

/// Navigation bound to the current page and locale
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    navigation: Navigation,
    current: String,
    locale: String,
}

impl LocaleRouter {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Current page's canonical pathname
    pub fn pathname(&self) -> String {
        let rest = self.navigation.pathname(&self.current);
        self.navigation
            .routing
            .table()
            .match_localized(&self.locale, &rest)
            .and_then(|(entry, params)| entry.canonical().render(&params).ok())
            .unwrap_or(rest)
    }

    /// Navigate to a canonical pathname, adding a history entry
    pub fn push(&self, pathname: &str) -> RouterAction {
        RouterAction {
            mode: HistoryMode::Push,
            href: self.navigation.href(pathname, &self.locale),
        }
    }

    /// Navigate to a canonical pathname, replacing the history entry
    pub fn replace(&self, pathname: &str) -> RouterAction {
        RouterAction {
            mode: HistoryMode::Replace,
            href: self.navigation.href(pathname, &self.locale),
        }
    }

    /// Href of the current page in another locale, query preserved
    pub fn switch_locale(&self, locale: &str) -> String {
        let (_, suffix) = split_suffix(&self.current);
        let query = suffix.split('#').next().unwrap_or_default();
        format!("{}{}", self.navigation.href(&self.pathname(), locale), query)
    }

    /// One link per configured locale for a language switcher
    pub fn locale_links(&self) -> Vec<Link> {
        self.navigation
            .routing
            .locales()
            .iter()
            .map(|code| Link {
                href: self.switch_locale(code),
                hreflang: Some(code.clone()),
                label: code.to_uppercase(),
                active: *code == self.locale,
            })
            .collect()
    }

    /// Link to a canonical pathname, marked active when it is the current page
    pub fn link(&self, pathname: &str, label: impl Into<String>) -> Link {
        let mut link = self.navigation.link(pathname, &self.locale, label);
        link.active = split_suffix(pathname).0 == self.pathname();
        link
    }
}

fn is_external(href: &str) -> bool {
    href.starts_with("//")
        || href.starts_with('#')
        || href.contains("://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
}

/// Split `path?query#fragment` into the path and the rest
fn split_suffix(href: &str) -> (&str, &str) {
    match href.find(['?', '#']) {
        Some(i) => (&href[..i], &href[i..]),
        None => (href, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::LocalePrefix;
    use crate::{Pathnames, RoutingConfig};

    fn navigation(prefix: LocalePrefix) -> Navigation {
        let pathnames = Pathnames::new()
            .shared("/", "/")
            .per_locale("/explore", [("en", "/explore"), ("de", "/entdecken")])
            .shared("/ai/[websiteName]", "/ai/[websiteName]");
        let config = RoutingConfig::new(["en", "de"], "en")
            .with_locale_prefix(prefix)
            .with_pathnames(pathnames);
        Navigation::new(Arc::new(LocaleRouting::new(config).unwrap()))
    }

    #[test]
    fn test_href() {
        let nav = navigation(LocalePrefix::Always);
        assert_eq!(nav.href("/", "en"), "/en");
        assert_eq!(nav.href("/explore", "de"), "/de/entdecken");
        assert_eq!(nav.href("/explore?q=1#top", "de"), "/de/entdecken?q=1#top");
        assert_eq!(nav.href("/submit", "DE"), "/de/submit");
        assert_eq!(nav.href("/submit", "xx"), "/en/submit");
        assert_eq!(nav.href("https://shipfaster.online/x", "de"), "https://shipfaster.online/x");
        assert_eq!(nav.href("#pricing", "de"), "#pricing");
    }

    #[test]
    fn test_href_as_needed() {
        let nav = navigation(LocalePrefix::AsNeeded);
        assert_eq!(nav.href("/explore", "en"), "/explore");
        assert_eq!(nav.href("/", "en"), "/");
        assert_eq!(nav.href("/explore", "de"), "/de/entdecken");
    }

    #[test]
    fn test_get_pathname() {
        let nav = navigation(LocalePrefix::Always);
        let params = HashMap::from([("websiteName".to_string(), "dall e".to_string())]);
        assert_eq!(nav.get_pathname("/ai/[websiteName]", &params, "de").unwrap(), "/ai/dall%20e");
        assert_eq!(nav.href_for("/ai/[websiteName]", &params, "de").unwrap(), "/de/ai/dall%20e");
        assert!(nav.get_pathname("/ai/[websiteName]", &HashMap::new(), "de").is_err());
    }

    #[test]
    fn test_redirect() {
        let nav = navigation(LocalePrefix::Always);
        let response = nav.redirect("/explore", "de");
        assert_eq!(response.status, 307);
        assert_eq!(response.header("location"), Some("/de/entdecken"));
    }

    #[test]
    fn test_pathname_and_locale_of() {
        let nav = navigation(LocalePrefix::Always);
        assert_eq!(nav.pathname("/de/entdecken?x=1"), "/entdecken");
        assert_eq!(nav.pathname("/de"), "/");
        assert_eq!(nav.pathname("/explore"), "/explore");
        assert_eq!(nav.locale_of("/de/entdecken"), "de");
        assert_eq!(nav.locale_of("/explore"), "en");
    }

    #[test]
    fn test_router_switch_locale() {
        let nav = navigation(LocalePrefix::Always);
        let router = nav.router("/de/entdecken?sort=new#list", "de");

        assert_eq!(router.pathname(), "/explore");
        assert_eq!(router.switch_locale("en"), "/en/explore?sort=new");

        let links = router.locale_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/en/explore?sort=new");
        assert!(!links[0].active);
        assert!(links[1].active);
        assert_eq!(links[1].hreflang.as_deref(), Some("de"));
    }

    #[test]
    fn test_router_push_replace() {
        let nav = navigation(LocalePrefix::Always);
        let router = nav.router("/de", "de");

        assert_eq!(
            router.push("/explore"),
            RouterAction {
                mode: HistoryMode::Push,
                href: "/de/entdecken".into()
            }
        );
        assert_eq!(router.replace("/").mode, HistoryMode::Replace);
        assert!(router.link("/", "Home").active);
        assert!(!router.link("/explore", "Explore").active);
    }
}
