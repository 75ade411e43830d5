//! Document metadata: title, description, icons, Open Graph and Twitter cards

use serde::{Deserialize, Serialize};

/// Site-wide document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub icons: Vec<Icon>,
    pub open_graph: OpenGraph,
    pub twitter: Twitter,
}

/// `<link>` icon entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub rel: String,
    pub url: String,
    #[serde(rename = "type")]
    pub mime: String,
}

impl Icon {
    pub fn svg(rel: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            url: url.into(),
            mime: "image/svg+xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Twitter {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

const SITE_NAME: &str = "Shipfaster AI";
const SITE_DESCRIPTION: &str = "Discover the best AI tools with Shipfaster AI";
const SITE_URL: &str = "https://shipfaster.online";
const FAVICON: &str = "/favicon.svg";

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: SITE_NAME.to_string(),
            description: SITE_DESCRIPTION.to_string(),
            icons: vec![
                Icon::svg("icon", FAVICON),
                Icon::svg("shortcut icon", FAVICON),
                Icon::svg("apple-touch-icon", FAVICON),
            ],
            open_graph: OpenGraph::default(),
            twitter: Twitter::default(),
        }
    }
}

impl Default for OpenGraph {
    fn default() -> Self {
        Self {
            title: SITE_NAME.to_string(),
            description: SITE_DESCRIPTION.to_string(),
            images: vec![FAVICON.to_string()],
            url: SITE_URL.to_string(),
            site_name: SITE_NAME.to_string(),
            locale: "en_US".to_string(),
            kind: "website".to_string(),
        }
    }
}

impl Default for Twitter {
    fn default() -> Self {
        Self {
            card: "summary_large_image".to_string(),
            title: SITE_NAME.to_string(),
            description: SITE_DESCRIPTION.to_string(),
            images: vec![FAVICON.to_string()],
        }
    }
}

/// Per-page overrides merged over the site metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metadata {
    /// Site metadata with page overrides applied.
    ///
    /// Only the document title and description change; social cards keep
    /// the site values.
    pub fn merge(&self, page: &PageMetadata) -> Metadata {
        let mut merged = self.clone();
        if let Some(title) = &page.title {
            merged.title = title.clone();
        }
        if let Some(description) = &page.description {
            merged.description = description.clone();
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let metadata = Metadata::default();
        assert_eq!(metadata.title, "Shipfaster AI");
        assert_eq!(metadata.icons.len(), 3);
        assert!(metadata.icons.iter().all(|i| i.url == "/favicon.svg" && i.mime == "image/svg+xml"));
        assert_eq!(metadata.open_graph.locale, "en_US");
        assert_eq!(metadata.open_graph.kind, "website");
        assert_eq!(metadata.twitter.card, "summary_large_image");
    }

    #[test]
    fn test_merge_page_overrides() {
        let site = Metadata::default();
        let merged = site.merge(&PageMetadata::titled("Explore | Shipfaster AI"));

        assert_eq!(merged.title, "Explore | Shipfaster AI");
        assert_eq!(merged.description, site.description);
        assert_eq!(merged.open_graph.title, "Shipfaster AI");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"open_graph": {"url": "https://example.test"}}"#).unwrap();
        assert_eq!(metadata.open_graph.url, "https://example.test");
        assert_eq!(metadata.open_graph.site_name, "Shipfaster AI");
        assert_eq!(metadata.title, "Shipfaster AI");
    }
}
