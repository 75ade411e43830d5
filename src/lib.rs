//! Shipfaster AI site shell
//!
//! Wires the workspace crates into the running site:
//!
//! - [`config`]: layered [`AppConfig`] (defaults, `shipfaster.toml`, `.env`,
//!   `SHIPFASTER_*` variables)
//! - [`pages`]: the six locale-prefixed pages and `GET /api/health`
//! - [`build_app`]: router behind request logging and locale routing
//!
//! ```no_run
//! use shipfaster::{AppConfig, build_app};
//!
//! # async fn run() -> shipfaster::Result<()> {
//! let config = AppConfig::load()?;
//! let addr = config.server.socket_addr()?;
//! build_app(&config)?.listen(addr).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pages;

pub use config::{AppConfig, LOCALES, ServerConfig, site_pathnames, site_routing};
pub use error::{AppError, Result};
pub use pages::{Page, Site, routes};

use shipfaster_core::{Application, LoggerMiddleware};
use shipfaster_i18n::LocaleMiddleware;
use std::sync::Arc;
use tracing::info;

/// Build the application for a validated configuration.
///
/// Middleware order: request logging, then locale routing, then the router.
pub fn build_app(config: &AppConfig) -> Result<Application> {
    let site = Arc::new(Site::new(config)?);
    let locale_routing = LocaleMiddleware::new(site.routing().clone());
    let router = routes(site)?;

    info!(
        locales = config.i18n.locales.len(),
        default_locale = %config.i18n.default_locale,
        locale_prefix = config.i18n.locale_prefix.as_str(),
        routes = router.patterns().len(),
        "Site ready"
    );

    Ok(Application::new(router)
        .with_middleware(LoggerMiddleware::new())
        .with_middleware(locale_routing))
}
