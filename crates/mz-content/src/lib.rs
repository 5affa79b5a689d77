//! Content retrieval for the Maklerzentrum site.
//!
//! [`CmsAdapter`] resolves site settings, navigation and the locale-scoped
//! FAQ and module lists. Each lookup goes through the content cache, then an
//! ordered chain of [`ContentSource`]s, and finally a built-in fallback, so
//! callers always receive usable content.
//!
//! # Sources
//!
//! - [`StaticSource`]: bundled JSON files (mock mode)
//! - [`DirectusSource`]: Directus items API (live mode)
//! - [`ContentApiSource`]: the site's own content API, admin tier first when
//!   an admin token is configured
//!
//! Remote sources use an [`HttpClient`]; [`UreqClient`] is the production
//! implementation.
//!
//! # Example
//!
//! ```no_run
//! use mz_config::Config;
//! use mz_content::{CmsAdapter, SiteSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None, None)?;
//! let adapter = CmsAdapter::from_config(&config);
//! let site = SiteSettings::from_payload(&adapter.get_site());
//! println!("{}", site.brand_name);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod error;
mod fallback;
mod http;
mod source;
#[cfg(test)]
mod testing;
mod types;

pub use adapter::{CmsAdapter, ContentOrigin, Resolved};
pub use error::ContentError;
pub use fallback::{FALLBACK_BRAND_NAME, fallback_envelope};
pub use http::{HttpClient, UreqClient};
pub use source::{
    ContentApiSource, ContentKind, ContentRequest, ContentSource, DirectusSource, StaticSource,
};
pub use types::{
    AssetRef, Contact, FaqItem, FooterGroup, LegalTexts, MobileLegalBlock, Module, NavLink,
    Navigation, SiteSettings,
};
