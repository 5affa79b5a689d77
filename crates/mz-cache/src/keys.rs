//! Cache key constants and composition.

use mz_config::Locale;

/// Key for the site settings envelope.
pub const SITE_DATA_KEY: &str = "site_data";

/// Key for the navigation envelope.
pub const NAVIGATION_DATA_KEY: &str = "navigation_data";

/// Composite key for locale-scoped content, e.g. `de-CH_faq`.
#[must_use]
pub fn locale_key(locale: Locale, endpoint: &str) -> String {
    format!("{locale}_{endpoint}")
}
