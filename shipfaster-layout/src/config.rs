//! Configuration for the root layout

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Class on the `<html>` element
    pub html_class: String,
    /// Classes on `<body>`
    pub body_class: String,
    /// Google Analytics; omitted from the document when `None`
    pub analytics: Option<AnalyticsConfig>,
    /// AdSense loader; omitted from the document when `None`
    pub ads: Option<AdsConfig>,
    pub toaster: ToasterConfig,
    /// Directory of `.hbs` files overriding built-in templates by name
    pub template_dir: Option<PathBuf>,
    /// Error on missing template variables
    pub strict_mode: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            html_class: "dark".to_string(),
            body_class: "relative mx-auto flex min-h-screen flex-col bg-shipfaster-black text-white"
                .to_string(),
            analytics: Some(AnalyticsConfig::default()),
            ads: None,
            toaster: ToasterConfig::default(),
            template_dir: None,
            strict_mode: true,
        }
    }
}

impl LayoutConfig {
    pub fn with_analytics(mut self, measurement_id: impl Into<String>) -> Self {
        self.analytics = Some(AnalyticsConfig {
            measurement_id: measurement_id.into(),
        });
        self
    }

    pub fn without_analytics(mut self) -> Self {
        self.analytics = None;
        self
    }

    pub fn with_ads(mut self, client_id: impl Into<String>) -> Self {
        self.ads = Some(AdsConfig {
            client_id: client_id.into(),
        });
        self
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }
}

/// Google Analytics (gtag.js) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub measurement_id: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            measurement_id: "G-VE82D5Q35M".to_string(),
        }
    }
}

/// Google AdSense settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsConfig {
    /// Publisher id (`ca-pub-...`)
    pub client_id: String,
}

/// Toast notification mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToasterConfig {
    pub position: String,
    pub class_names: ToastClassNames,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            position: "top-center".to_string(),
            class_names: ToastClassNames::default(),
        }
    }
}

/// Per-kind toast classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastClassNames {
    pub error: String,
    pub success: String,
    pub warning: String,
    pub info: String,
}

impl Default for ToastClassNames {
    fn default() -> Self {
        Self {
            error: "bg-red-400".to_string(),
            success: "text-green-400".to_string(),
            warning: "text-yellow-400".to_string(),
            info: "bg-blue-400".to_string(),
        }
    }
}
