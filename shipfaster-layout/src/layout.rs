//! Root document layout

use crate::config::{AdsConfig, AnalyticsConfig, LayoutConfig, ToasterConfig};
use crate::engine::LayoutEngine;
use crate::metadata::{Metadata, PageMetadata};
use crate::Result;
use serde::Serialize;
use serde_json::{Value, json};
use shipfaster_core::HttpResponse;
use shipfaster_i18n::Link;
use tracing::debug;

/// Navigation bar contents
#[derive(Debug, Clone, Serialize)]
pub struct NavBar {
    /// Accessible name of the `<nav>` element
    pub label: String,
    pub home: Link,
    pub links: Vec<Link>,
    /// Locale switcher entries
    pub locales: Vec<Link>,
}

/// hreflang alternate for the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

/// Everything a page hands to the layout
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub locale: String,
    /// Messages for the client-side provider
    pub messages: Value,
    pub page: PageMetadata,
    pub nav: NavBar,
    pub alternates: Vec<Alternate>,
    /// Page HTML; the loading indicator is shown when blank
    pub content: String,
    pub loading_label: String,
}

#[derive(Serialize)]
struct Document<'a> {
    lang: &'a str,
    html_class: &'a str,
    body_class: &'a str,
    metadata: Metadata,
    alternates: &'a [Alternate],
    analytics: Option<&'a AnalyticsConfig>,
    ads: Option<&'a AdsConfig>,
    toaster: &'a ToasterConfig,
    intl: Value,
    nav: &'a NavBar,
    has_content: bool,
    content: &'a str,
    loading_label: &'a str,
    seo: Value,
}

/// Renders full HTML documents around page content
#[derive(Clone)]
pub struct RootLayout {
    engine: LayoutEngine,
    metadata: Metadata,
    config: LayoutConfig,
}

impl RootLayout {
    pub fn new(metadata: Metadata, config: LayoutConfig) -> Result<Self> {
        let engine = LayoutEngine::new(config.strict_mode)?;
        if let Some(dir) = &config.template_dir {
            engine.load_overrides(dir)?;
        }

        Ok(Self {
            engine,
            metadata,
            config,
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Render the document for a page
    pub fn render(&self, ctx: &LayoutContext) -> Result<String> {
        let metadata = self.metadata.merge(&ctx.page);
        let seo = json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": metadata.open_graph.site_name,
            "url": metadata.open_graph.url,
            "description": metadata.description,
            "inLanguage": ctx.locale,
        });

        let document = Document {
            lang: &ctx.locale,
            html_class: &self.config.html_class,
            body_class: &self.config.body_class,
            alternates: &ctx.alternates,
            analytics: self
                .config
                .analytics
                .as_ref()
                .filter(|a| !a.measurement_id.trim().is_empty()),
            ads: self
                .config
                .ads
                .as_ref()
                .filter(|a| !a.client_id.trim().is_empty()),
            toaster: &self.config.toaster,
            intl: json!({ "locale": ctx.locale, "messages": ctx.messages }),
            nav: &ctx.nav,
            has_content: !ctx.content.trim().is_empty(),
            content: &ctx.content,
            loading_label: &ctx.loading_label,
            seo,
            metadata,
        };

        debug!(locale = %ctx.locale, title = %document.metadata.title, "Rendering layout");
        self.engine.render("layout", &document)
    }

    /// Render the document as a `200 OK` HTML response
    pub fn render_response(&self, ctx: &LayoutContext) -> Result<HttpResponse> {
        Ok(HttpResponse::html(self.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str, label: &str, active: bool) -> Link {
        Link {
            href: href.to_string(),
            hreflang: None,
            label: label.to_string(),
            active,
        }
    }

    fn context(content: &str) -> LayoutContext {
        LayoutContext {
            locale: "de".to_string(),
            messages: json!({"Navigation": {"explore": "Entdecken"}, "Evil": "</script><script>x()</script>"}),
            page: PageMetadata::default(),
            nav: NavBar {
                label: "Hauptnavigation".to_string(),
                home: link("/de", "Shipfaster AI", false),
                links: vec![
                    link("/de/explore", "Entdecken", true),
                    link("/de/submit", "Einreichen", false),
                ],
                locales: vec![Link {
                    href: "/en/explore".to_string(),
                    hreflang: Some("en".to_string()),
                    label: "EN".to_string(),
                    active: false,
                }],
            },
            alternates: vec![Alternate {
                hreflang: "x-default".to_string(),
                href: "https://shipfaster.online/explore".to_string(),
            }],
            content: content.to_string(),
            loading_label: "Lädt".to_string(),
        }
    }

    fn layout(config: LayoutConfig) -> RootLayout {
        RootLayout::new(Metadata::default(), config).unwrap()
    }

    #[test]
    fn test_document_shell() {
        let html = layout(LayoutConfig::default()).render(&context("<h1>Hallo</h1>")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="de" class="dark">"#));
        assert!(html.contains("<title>Shipfaster AI</title>"));
        assert!(html.contains(r#"<meta name="description" content="Discover the best AI tools with Shipfaster AI">"#));
        assert!(html.contains(r#"<link rel="apple-touch-icon" href="/favicon.svg" type="image/svg+xml">"#));
        assert!(html.contains(r#"<meta property="og:locale" content="en_US">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains(r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#));
        assert!(html.contains(
            r#"<body class="relative mx-auto flex min-h-screen flex-col bg-shipfaster-black text-white">"#
        ));
        assert!(html.contains("<h1>Hallo</h1>"));
        assert!(!html.contains("data-loading"));
    }

    #[test]
    fn test_analytics_tag() {
        let html = layout(LayoutConfig::default()).render(&context("x")).unwrap();
        assert!(html.contains(r#"<script async src="https://www.googletagmanager.com/gtag/js?id=G-VE82D5Q35M"></script>"#));
        assert!(html.contains(r#"gtag('config', "G-VE82D5Q35M");"#));

        let html = layout(LayoutConfig::default().without_analytics())
            .render(&context("x"))
            .unwrap();
        assert!(!html.contains("googletagmanager"));
    }

    #[test]
    fn test_provider_payload_is_script_safe() {
        let html = layout(LayoutConfig::default()).render(&context("x")).unwrap();
        assert!(html.contains(r#""locale":"de""#));
        assert!(html.contains("Entdecken"));
        assert!(!html.contains("</script><script>x()"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_toaster_and_navigation() {
        let html = layout(LayoutConfig::default()).render(&context("x")).unwrap();
        assert!(html.contains(r#"data-position="top-center""#));
        assert!(html.contains(r#"data-class-error="bg-red-400""#));
        assert!(html.contains(r#"data-class-success="text-green-400""#));
        assert!(html.contains(r#"<a href="/de/explore" aria-current="page">Entdecken</a>"#));
        assert!(html.contains(r#"<a href="/en/explore" hreflang="en">EN</a>"#));
        assert!(html.contains(r#"<link rel="alternate" hreflang="x-default" href="https://shipfaster.online/explore">"#));
    }

    #[test]
    fn test_loading_fallback_for_empty_content() {
        let html = layout(LayoutConfig::default()).render(&context("   ")).unwrap();
        assert!(html.contains("data-loading>Lädt</div>"));
    }

    #[test]
    fn test_seo_and_ads() {
        let html = layout(LayoutConfig::default()).render(&context("x")).unwrap();
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert!(html.contains(r#""@type":"WebSite""#));
        assert!(!html.contains("adsbygoogle"));

        let html = layout(LayoutConfig::default().with_ads("ca-pub-42"))
            .render(&context("x"))
            .unwrap();
        assert!(html.contains("adsbygoogle.js?client"));
        assert!(html.contains("ca-pub-42"));
    }

    #[test]
    fn test_page_title_override() {
        let mut ctx = context("x");
        ctx.page = PageMetadata::titled("Entdecken | Shipfaster AI");
        let html = layout(LayoutConfig::default()).render(&ctx).unwrap();
        assert!(html.contains("<title>Entdecken | Shipfaster AI</title>"));
        assert!(html.contains(r#"<meta property="og:title" content="Shipfaster AI">"#));
    }

    #[test]
    fn test_render_response() {
        let response = layout(LayoutConfig::default())
            .render_response(&context("x"))
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
    }
}
