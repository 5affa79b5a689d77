//! Built-in content used when every source fails.

use serde_json::{Value, json};

use crate::source::ContentKind;

/// Brand name shown while the CMS is unreachable.
pub const FALLBACK_BRAND_NAME: &str = "Maklerzentrum Schweiz AG";

/// Fallback envelope for `kind`.
///
/// Site settings carry the brand, claim, contact and placeholder legal pages.
/// Navigation is empty and lists have no entries.
#[must_use]
pub fn fallback_envelope(kind: ContentKind) -> Value {
    match kind {
        ContentKind::Site => json!({
            "site_settings": {
                "brandName": FALLBACK_BRAND_NAME,
                "claim": "Keine halben Sachen.",
                "contact": {
                    "email": "info@maklerzentrum.ch",
                    "phone": "+41 79 948 69 86"
                },
                "legal": {
                    "imprintHtml": "<h1>Impressum</h1><p>Daten werden geladen...</p>",
                    "privacyHtml": "<h1>Datenschutzerkl\u{00e4}rung</h1><p>Daten werden geladen...</p>",
                    "termsHtml": "<h1>AGB</h1><p>Daten werden geladen...</p>"
                }
            }
        }),
        ContentKind::Navigation => json!({ "navigation": {} }),
        ContentKind::Faq => json!({ "faq": [] }),
        ContentKind::Modules => json!({ "modules": [] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_fallback_has_brand_and_legal() {
        let envelope = fallback_envelope(ContentKind::Site);
        let site = &envelope["site_settings"];

        assert_eq!(site["brandName"], FALLBACK_BRAND_NAME);
        assert_eq!(site["contact"]["email"], "info@maklerzentrum.ch");
        assert!(
            site["legal"]["imprintHtml"]
                .as_str()
                .unwrap()
                .starts_with("<h1>Impressum</h1>")
        );
    }

    #[test]
    fn test_list_fallbacks_are_empty() {
        assert_eq!(fallback_envelope(ContentKind::Faq), json!({"faq": []}));
        assert_eq!(fallback_envelope(ContentKind::Modules), json!({"modules": []}));
        assert_eq!(
            fallback_envelope(ContentKind::Navigation),
            json!({"navigation": {}})
        );
    }
}
