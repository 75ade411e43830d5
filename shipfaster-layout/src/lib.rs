//! Root document layout for the Shipfaster site
//!
//! Renders the HTML shell around page content with Handlebars:
//!
//! - document metadata (title, description, icons, Open Graph, Twitter)
//! - Google Analytics loader and hreflang alternates in `<head>`
//! - the i18n provider payload (locale + messages as script-safe JSON)
//! - toaster mount, navigation bar with locale switcher
//! - a loading boundary around the page content
//! - JSON-LD `WebSite` data and the optional AdSense loader
//!
//! Templates are built in; a template directory can override any of them by
//! name (`layout`, `head`, `toaster`, `navigation`, `loading`, `seo_script`,
//! `ad_script`).

pub mod config;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod layout;
pub mod metadata;

pub use config::{AdsConfig, AnalyticsConfig, LayoutConfig, ToastClassNames, ToasterConfig};
pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use layout::{Alternate, LayoutContext, NavBar, RootLayout};
pub use metadata::{Icon, Metadata, OpenGraph, PageMetadata, Twitter};
