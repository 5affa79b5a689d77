//! Typed, fully defaulted views over content payloads.
//!
//! Payloads stay untyped JSON in the cache and the adapter. Renderers read
//! them through these views, which tolerate missing fields by substituting
//! defaults. A payload that does not deserialize at all (wrong JSON types)
//! is logged and replaced by the default view.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deserialize `payload`, falling back to `T::default()` on type errors.
fn view_or_default<T: DeserializeOwned + Default>(payload: &Value, what: &str) -> T {
    if payload.is_null() {
        return T::default();
    }
    serde_json::from_value(payload.clone()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Malformed {what} payload, using defaults");
        T::default()
    })
}

/// Deserialize each list entry, skipping entries that do not fit.
fn list_view<T: DeserializeOwned>(items: &[Value], what: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed {what} entry");
                None
            }
        })
        .collect()
}

/// Reference to an image: a direct URL or a CMS asset id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRef {
    /// Absolute or site-relative URL.
    pub url: Option<String>,
    /// Directus asset id.
    pub id: Option<String>,
}

impl AssetRef {
    /// Read an asset reference from an arbitrary JSON value.
    ///
    /// Objects are read as `{url, id}`; anything else yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let asset: Self = view_or_default(value, "asset");
        (asset.url.is_some() || asset.id.is_some()).then_some(asset)
    }
}

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Contact e-mail address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// Legal documents as CMS-managed HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalTexts {
    /// Imprint (Impressum).
    pub imprint_html: String,
    /// Privacy policy.
    pub privacy_html: String,
    /// Terms and conditions (AGB).
    pub terms_html: String,
}

impl LegalTexts {
    /// Look up a document by its payload field name (`imprintHtml`, ...).
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "imprintHtml" => Some(&self.imprint_html),
            "privacyHtml" => Some(&self.privacy_html),
            "termsHtml" => Some(&self.terms_html),
            _ => None,
        }
    }
}

/// Global site settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    /// Company name.
    pub brand_name: String,
    /// Tagline.
    pub claim: String,
    /// Contact details.
    pub contact: Contact,
    /// Legal documents.
    pub legal: LegalTexts,
    /// Site logo.
    pub logo: Option<AssetRef>,
    /// Theme colors keyed by role (`primary`, `accent`, ...).
    pub colors: BTreeMap<String, String>,
}

impl SiteSettings {
    /// View over a `site_settings` payload.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        view_or_default(payload, "site settings")
    }
}

/// Single navigation link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    /// Link text.
    pub label: String,
    /// Link target URL.
    pub url: String,
    /// Browsing context (`_blank`, ...).
    pub target: Option<String>,
}

/// Titled group of footer links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterGroup {
    /// Group heading; also addresses the footer slot.
    pub title: String,
    /// Links in the group.
    pub links: Vec<NavLink>,
}

/// Collapsible block of legal links on small screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileLegalBlock {
    /// Toggle button label.
    pub title: String,
    /// Whether the link list starts collapsed.
    pub collapsed: bool,
    /// Legal links.
    pub links: Vec<NavLink>,
}

/// Navigation tree.
///
/// Sections are optional: an absent section leaves its slot untouched when
/// rendering, an empty one clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    /// Main menu.
    pub main: Option<Vec<NavLink>>,
    /// Footer link groups.
    pub footer_groups: Option<Vec<FooterGroup>>,
    /// Mobile legal block.
    pub mobile_legal_block: Option<MobileLegalBlock>,
}

impl Navigation {
    /// View over a `navigation` payload.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        view_or_default(payload, "navigation")
    }
}

/// FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    /// Question (plain text).
    pub question: String,
    /// Answer (rich text).
    pub answer: String,
    /// Topic used for grouping.
    pub topic: String,
    /// Whether the entry is highlighted.
    pub featured: bool,
    /// Sort position.
    pub order: i64,
    /// Hidden entries are not rendered.
    pub visible: bool,
}

impl Default for FaqItem {
    fn default() -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            topic: "allgemein".to_owned(),
            featured: false,
            order: 999,
            visible: true,
        }
    }
}

impl FaqItem {
    /// Views over a list of FAQ payload entries.
    #[must_use]
    pub fn list_from(items: &[Value]) -> Vec<Self> {
        list_view(items, "FAQ")
    }
}

/// Training module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Module {
    /// URL slug.
    pub slug: String,
    /// Title (plain text).
    pub title: String,
    /// Delivery format: `online` or classroom.
    pub format: String,
    /// Length in days.
    pub duration_days: u32,
    /// Bullet points (plain text).
    pub bullets: Vec<String>,
    /// Sort position.
    pub order: i64,
    /// Hidden modules are not rendered.
    pub visible: bool,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            slug: String::new(),
            title: String::new(),
            format: "online".to_owned(),
            duration_days: 1,
            bullets: Vec::new(),
            order: 999,
            visible: true,
        }
    }
}

impl Module {
    /// Whether the module is delivered online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.format == "online"
    }

    /// Views over a list of module payload entries.
    #[must_use]
    pub fn list_from(items: &[Value]) -> Vec<Self> {
        list_view(items, "module")
    }
}
