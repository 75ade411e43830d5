//! Locale routing middleware
//!
//! Maps browser-facing paths onto `/{locale}{canonical path}` routes:
//!
//! - unprefixed requests are redirected (307) to the detected locale
//! - wrong-case prefixes, trailing slashes and canonical paths with a
//!   different localized form are redirected to the canonical URL
//! - localized paths are rewritten to their canonical route internally
//!
//! The resolved locale reaches handlers as the `locale` path parameter and
//! the [`LOCALE_HEADER`] request header.

use crate::pathnames::{PathnameEntry, Params};
use crate::routing::{LocalePrefix, LocaleRouting, prefixed};
use async_trait::async_trait;
use shipfaster_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use std::sync::Arc;
use tracing::{debug, trace};

/// Request header carrying the resolved locale
pub const LOCALE_HEADER: &str = "x-shipfaster-locale";

/// Lifetime of the locale cookie (one year)
pub const LOCALE_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Middleware resolving the request locale and canonicalizing the path
#[derive(Debug, Clone)]
pub struct LocaleMiddleware {
    routing: Arc<LocaleRouting>,
}

/// What the middleware decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleDecision {
    /// Path is outside the middleware's scope
    Bypass,
    /// Send the browser to another URL
    Redirect { locale: String, location: String },
    /// Serve the request under its canonical route
    Rewrite { locale: String, path: String },
}

struct Resolved<'t> {
    canonical: String,
    localized: String,
    matched: Option<(&'t PathnameEntry, Params)>,
}

impl LocaleMiddleware {
    pub fn new(routing: Arc<LocaleRouting>) -> Self {
        Self { routing }
    }

    pub fn routing(&self) -> &Arc<LocaleRouting> {
        &self.routing
    }

    /// Locale from cookie, then Accept-Language, then the default.
    pub fn detect_locale(&self, req: &HttpRequest) -> String {
        let config = self.routing.config();
        if config.locale_detection {
            if let Some(locale) = req
                .cookie(&config.locale_cookie)
                .and_then(|c| self.routing.find_locale(c))
            {
                return locale.to_string();
            }
            if let Some(locale) = req
                .header("accept-language")
                .and_then(|h| self.routing.negotiate(h))
            {
                return locale.to_string();
            }
        }
        config.default_locale.clone()
    }

    /// Decide how to handle a request without running it.
    pub fn decide(&self, req: &HttpRequest) -> Result<LocaleDecision, Error> {
        let path = req.path_only();
        if self.routing.is_excluded(path) {
            return Ok(LocaleDecision::Bypass);
        }

        let normalized = normalize(path);
        let (path_locale, rest) = match self.routing.split_locale(&normalized) {
            Some((locale, rest)) => (Some(locale), rest),
            None => (None, normalized.as_str()),
        };
        let locale = match path_locale {
            Some(locale) => locale.to_string(),
            None => self.detect_locale(req),
        };

        let resolved = self.resolve(&locale, rest)?;
        let internal = prefixed(&locale, &resolved.canonical);

        if self.routing.config().locale_prefix == LocalePrefix::Never {
            return Ok(LocaleDecision::Rewrite { locale, path: internal });
        }

        let expected = self.routing.external_path(&locale, &resolved.localized);
        if expected != path {
            let location = match req.query_string() {
                Some(query) => format!("{}?{}", expected, query),
                None => expected,
            };
            return Ok(LocaleDecision::Redirect { locale, location });
        }

        Ok(LocaleDecision::Rewrite { locale, path: internal })
    }

    /// Canonical and localized forms of a path relative to the locale prefix
    fn resolve<'t>(&'t self, locale: &str, rest: &str) -> Result<Resolved<'t>, Error> {
        let table = self.routing.table();

        if let Some((entry, params)) = table.match_localized(locale, rest) {
            let canonical = entry.canonical().render(&params).map_err(internal)?;
            return Ok(Resolved {
                canonical,
                localized: rest.to_string(),
                matched: Some((entry, params)),
            });
        }

        if let Some((entry, params)) = table.match_canonical(rest) {
            let localized = entry.localized(locale).render(&params).map_err(internal)?;
            return Ok(Resolved {
                canonical: rest.to_string(),
                localized,
                matched: Some((entry, params)),
            });
        }

        Ok(Resolved {
            canonical: rest.to_string(),
            localized: rest.to_string(),
            matched: None,
        })
    }

    /// `Link` header value listing every locale's URL for the page
    pub fn alternate_links(&self, req: &HttpRequest) -> Result<Option<String>, Error> {
        let config = self.routing.config();
        if !config.alternate_links || config.locale_prefix == LocalePrefix::Never {
            return Ok(None);
        }

        let normalized = normalize(req.path_only());
        let (locale, rest) = match self.routing.split_locale(&normalized) {
            Some((locale, rest)) => (locale.to_string(), rest),
            None => (config.default_locale.clone(), normalized.as_str()),
        };
        let Some((entry, params)) = self.resolve(&locale, rest)?.matched else {
            return Ok(None);
        };

        let origin = origin(req);
        let mut links = Vec::with_capacity(config.locales.len() + 1);
        for code in &config.locales {
            let localized = entry.localized(code).render(&params).map_err(internal)?;
            links.push(format!(
                "<{}{}>; rel=\"alternate\"; hreflang=\"{}\"",
                origin,
                self.routing.external_path(code, &localized),
                code
            ));
        }

        let default_path = entry
            .localized(&config.default_locale)
            .render(&params)
            .map_err(internal)?;
        links.push(format!(
            "<{}{}>; rel=\"alternate\"; hreflang=\"x-default\"",
            origin, default_path
        ));

        Ok(Some(links.join(", ")))
    }

    fn decorate(
        &self,
        req: &HttpRequest,
        locale: &str,
        mut response: HttpResponse,
    ) -> Result<HttpResponse, Error> {
        let config = self.routing.config();

        if req.cookie(&config.locale_cookie) != Some(locale) {
            response = response.with_header(
                "Set-Cookie".to_string(),
                format!(
                    "{}={}; Path=/; SameSite=Lax; Max-Age={}",
                    config.locale_cookie, locale, LOCALE_COOKIE_MAX_AGE
                ),
            );
        }

        if let Some(links) = self.alternate_links(req)? {
            response = response.with_header("Link".to_string(), links);
        }

        Ok(response)
    }
}

#[async_trait]
impl Middleware for LocaleMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        match self.decide(&req)? {
            LocaleDecision::Bypass => {
                trace!(path = %req.path, "Locale routing skipped");
                next(req).await
            }
            LocaleDecision::Redirect { locale, location } => {
                debug!(from = %req.path, to = %location, locale = %locale, "Locale redirect");
                self.decorate(&req, &locale, HttpResponse::temporary_redirect(location))
            }
            LocaleDecision::Rewrite { locale, path } => {
                let original = req.clone();
                if path != req.path_only() {
                    trace!(from = %req.path, to = %path, "Locale rewrite");
                }

                req.path = match req.query_string() {
                    Some(query) => format!("{}?{}", path, query),
                    None => path,
                };
                req.set_header(LOCALE_HEADER, locale.clone());
                req.path_params.insert("locale".to_string(), locale.clone());

                let response = next(req).await?;
                self.decorate(&original, &locale, response)
            }
        }
    }
}

fn internal(err: crate::I18nError) -> Error {
    Error::Internal(err.to_string())
}

/// Strip trailing slashes; the root stays `/`.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn origin(req: &HttpRequest) -> String {
    match req.header("host") {
        Some(host) => {
            let scheme = req
                .header("x-forwarded-proto")
                .and_then(|p| p.split(',').next())
                .map(str::trim)
                .unwrap_or("http");
            format!("{}://{}", scheme, host)
        }
        None => String::new(),
    }
}
