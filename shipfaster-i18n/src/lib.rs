//! Internationalization for the Shipfaster site
//!
//! - **Locale routing**: [`LocaleMiddleware`] keeps every page URL under a
//!   locale prefix, detecting the locale from cookie and Accept-Language
//! - **Pathnames**: canonical route templates mapped to per-locale URLs
//! - **Navigation**: hrefs, redirects and a locale switcher that agree with
//!   the middleware
//! - **Messages**: nested JSON catalogues with default-locale fallback
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use shipfaster_i18n::{LocaleMiddleware, LocaleRouting, Navigation, Pathnames, RoutingConfig};
//!
//! let config = RoutingConfig::new(["en", "de"], "en")
//!     .with_pathnames(Pathnames::new().shared("/", "/").shared("/explore", "/explore"));
//! let routing = Arc::new(LocaleRouting::new(config)?);
//!
//! let middleware = LocaleMiddleware::new(routing.clone());
//! let navigation = Navigation::new(routing);
//! assert_eq!(navigation.href("/explore", "de"), "/de/explore");
//! # Ok::<(), shipfaster_i18n::I18nError>(())
//! ```

mod error;
mod locale;
mod messages;
mod middleware;
mod navigation;
mod pathnames;
mod routing;

pub use error::I18nError;
pub use locale::{Locale, best_match, negotiate_locale, parse_accept_language};
pub use messages::{I18n, MessageBundle, Messages};
pub use middleware::{LOCALE_COOKIE_MAX_AGE, LOCALE_HEADER, LocaleDecision, LocaleMiddleware};
pub use navigation::{HistoryMode, Link, LocaleRouter, Navigation, RouterAction};
pub use pathnames::{Localized, Params, PathTemplate, PathnameEntry, PathnameTable, Pathnames};
pub use routing::{LocalePrefix, LocaleRouting, RoutingConfig, prefixed};

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        I18n, I18nError, Locale, LocaleMiddleware, LocalePrefix, LocaleRouting, Navigation,
        Pathnames, Result, RoutingConfig,
    };
}
