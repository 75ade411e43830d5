//! Page handlers
//!
//! Every page lives under `/{locale}` and renders placeholder content from
//! the message catalogue through the root layout. The locale middleware has
//! already resolved the locale and rewritten the path to its canonical form
//! by the time a handler runs.

use crate::config::AppConfig;
use crate::error::Result;
use serde::Serialize;
use serde_json::json;
use shipfaster_core::{Error, HttpRequest, HttpResponse, Router, handler};
use shipfaster_i18n::{
    I18n, I18nError, LOCALE_HEADER, Link, Locale, LocalePrefix, LocaleRouting, MessageBundle,
    Navigation,
};
use shipfaster_layout::{Alternate, LayoutContext, NavBar, PageMetadata, RootLayout};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// English catalogue compiled into the binary
const BUILTIN_MESSAGES: &str = include_str!("../../messages/en.json");

const PAGE_TEMPLATE: &str = include_str!("page.hbs");

/// Category codes linked from the explore page
const FEATURED_CATEGORIES: &[&str] = &["text-writing", "image", "video", "code-it"];

/// The site's pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Explore,
    Submit,
    Startup,
    /// `/ai/[websiteName]`
    Tool,
    /// `/category/[code]`
    Category,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Explore,
        Page::Submit,
        Page::Startup,
        Page::Tool,
        Page::Category,
    ];

    /// Canonical pathname template, as named in the pathname map
    pub fn template(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Explore => "/explore",
            Page::Submit => "/submit",
            Page::Startup => "/startup",
            Page::Tool => "/ai/[websiteName]",
            Page::Category => "/category/[code]",
        }
    }

    /// Router pattern under the locale segment
    pub fn route(&self) -> &'static str {
        match self {
            Page::Home => "/{locale}",
            Page::Explore => "/{locale}/explore",
            Page::Submit => "/{locale}/submit",
            Page::Startup => "/{locale}/startup",
            Page::Tool => "/{locale}/ai/{websiteName}",
            Page::Category => "/{locale}/category/{code}",
        }
    }

    /// Message namespace holding the page's texts
    fn namespace(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Explore => "Explore",
            Page::Submit => "Submit",
            Page::Startup => "Startup",
            Page::Tool => "Tool",
            Page::Category => "Category",
        }
    }

    /// Route parameter and the message argument it fills
    fn param(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Page::Tool => Some(("websiteName", "name")),
            Page::Category => Some(("code", "code")),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct PageContent<'a> {
    page: &'a str,
    heading: String,
    intro: String,
    links: Vec<Link>,
}

/// Shared state behind every page handler
pub struct Site {
    routing: Arc<LocaleRouting>,
    navigation: Navigation,
    i18n: I18n,
    layout: RootLayout,
    origin: String,
}

impl Site {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let routing = Arc::new(LocaleRouting::new(config.i18n.clone())?);
        let navigation = Navigation::new(routing.clone());
        let i18n = load_messages(config)?;

        let layout = RootLayout::new(config.metadata.clone(), config.layout.clone())?;
        if !layout.engine().has_template("page") {
            layout.engine().register_template("page", PAGE_TEMPLATE)?;
        }

        Ok(Self {
            routing,
            navigation,
            i18n,
            layout,
            origin: config.metadata.open_graph.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn routing(&self) -> &Arc<LocaleRouting> {
        &self.routing
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Render `page` for a request the locale middleware has rewritten
    pub fn render(&self, req: &HttpRequest, page: Page) -> Result<HttpResponse> {
        let code = req
            .param("locale")
            .map(String::as_str)
            .or_else(|| req.header(LOCALE_HEADER))
            .unwrap_or(self.routing.default_locale());
        let code = self
            .routing
            .find_locale(code)
            .ok_or_else(|| I18nError::UnknownLocale(code.to_string()))?
            .to_string();
        let locale = Locale::parse(&code)?;

        let mut params = HashMap::new();
        let mut args: Vec<(&str, &str)> = Vec::new();
        if let Some((name, arg)) = page.param() {
            let value = req.param(name).ok_or_else(|| {
                Error::BadRequest(format!("missing route parameter '{}'", name))
            })?;
            params.insert(name.to_string(), value.clone());
            args.push((arg, value.as_str()));
        }

        let t = |key: &str| self.i18n.t_args(&format!("{}.{}", page.namespace(), key), &locale, &args);
        let router = self.navigation.router(&req.path, &code);

        let content = PageContent {
            page: page.namespace(),
            heading: t("heading"),
            intro: t("intro"),
            links: self.page_links(page, &code)?,
        };
        let content = self.layout.engine().render("page", &content)?;

        let nav_label = |key: &str| self.i18n.t(&format!("Navigation.{}", key), &locale);
        let nav = NavBar {
            label: nav_label("label"),
            home: router.link("/", nav_label("home")),
            links: vec![
                router.link("/explore", nav_label("explore")),
                router.link("/submit", nav_label("submit")),
                router.link("/startup", nav_label("startup")),
            ],
            locales: router.locale_links(),
        };

        let ctx = LayoutContext {
            locale: code.clone(),
            messages: self.i18n.messages_json(&locale),
            page: PageMetadata::titled(t("title")),
            nav,
            alternates: self.alternates(page, &params)?,
            content,
            loading_label: self.i18n.t("Common.loading", &locale),
        };

        debug!(page = page.namespace(), locale = %code, "Rendering page");
        Ok(self.layout.render_response(&ctx)?)
    }

    fn page_links(&self, page: Page, locale: &str) -> Result<Vec<Link>> {
        let locale_tag = Locale::parse(locale)?;
        let label = |key: &str| self.i18n.t(key, &locale_tag);

        let links = match page {
            Page::Home => vec![
                self.navigation.link("/explore", locale, label("Navigation.explore")),
                self.navigation.link("/submit", locale, label("Navigation.submit")),
            ],
            Page::Explore => FEATURED_CATEGORIES
                .iter()
                .map(|code| {
                    let params = HashMap::from([("code".to_string(), code.to_string())]);
                    let href = self
                        .navigation
                        .href_for(Page::Category.template(), &params, locale)?;
                    Ok(Link {
                        href,
                        hreflang: None,
                        label: code.to_string(),
                        active: false,
                    })
                })
                .collect::<std::result::Result<Vec<_>, I18nError>>()?,
            Page::Tool | Page::Category => {
                vec![self.navigation.link("/explore", locale, label("Navigation.explore"))]
            }
            Page::Submit | Page::Startup => Vec::new(),
        };
        Ok(links)
    }

    /// hreflang alternates for the page in every locale plus `x-default`
    fn alternates(&self, page: Page, params: &HashMap<String, String>) -> Result<Vec<Alternate>> {
        let config = self.routing.config();
        if !config.alternate_links || config.locale_prefix == LocalePrefix::Never {
            return Ok(Vec::new());
        }

        let mut alternates = Vec::with_capacity(config.locales.len() + 1);
        for code in self.routing.locales() {
            alternates.push(Alternate {
                hreflang: code.clone(),
                href: format!(
                    "{}{}",
                    self.origin,
                    self.navigation.href_for(page.template(), params, code)?
                ),
            });
        }

        let default_path =
            self.navigation
                .get_pathname(page.template(), params, self.routing.default_locale())?;
        alternates.push(Alternate {
            hreflang: "x-default".to_string(),
            href: format!("{}{}", self.origin, default_path),
        });
        Ok(alternates)
    }
}

/// Built-in English messages, then any catalogues in the configured directory
fn load_messages(config: &AppConfig) -> Result<I18n> {
    let default_locale = Locale::parse(&config.i18n.default_locale)?;
    let mut i18n = I18n::new(default_locale);

    match &config.messages_dir {
        Some(dir) if dir.is_dir() => {
            i18n = i18n.load_from_dir(dir)?;
            info!(dir = %dir.display(), "Loaded message catalogues");
        }
        Some(dir) => warn!(dir = %dir.display(), "Message directory not found, using built-in messages"),
        None => {}
    }

    let english = Locale::parse("en")?;
    if i18n.add_bundle_if_missing(&english, MessageBundle::from_json(BUILTIN_MESSAGES)?) {
        debug!("Using built-in English messages");
    }
    Ok(i18n)
}

/// Router with the page routes and `GET /api/health`
pub fn routes(site: Arc<Site>) -> std::result::Result<Router, Error> {
    let mut router = Router::new();

    for page in Page::ALL {
        let site = site.clone();
        router.get(
            page.route(),
            handler(move |req| {
                let site = site.clone();
                async move { site.render(&req, page).map_err(Error::from) }
            }),
        )?;
    }

    let locales = site.routing().locales().to_vec();
    router.get(
        "/api/health",
        handler(move |_req| {
            let body = json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "locales": locales,
            });
            async move { HttpResponse::json(&body) }
        }),
    )?;

    Ok(router)
}
