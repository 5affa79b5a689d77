//! Content sources.
//!
//! A [`ContentSource`] turns a [`ContentRequest`] into a content envelope: a
//! JSON object wrapping the payload under its kind's key (`site_settings`,
//! `navigation`, `faq` or `modules`). The adapter tries its sources in order
//! until one succeeds.

mod content_api;
mod directus;
mod static_files;

pub use content_api::ContentApiSource;
pub use directus::DirectusSource;
pub use static_files::StaticSource;

use std::fmt;

use mz_cache::{NAVIGATION_DATA_KEY, SITE_DATA_KEY, locale_key};
use mz_config::Locale;
use serde_json::Value;

use crate::error::ContentError;

/// Kind of content being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Global site settings (brand, contact, legal texts).
    Site,
    /// Navigation tree (main menu, footer groups, mobile legal block).
    Navigation,
    /// Locale-scoped FAQ list.
    Faq,
    /// Locale-scoped training module list.
    Modules,
}

impl ContentKind {
    /// Key under which the payload sits in its envelope.
    #[must_use]
    pub fn envelope_key(self) -> &'static str {
        match self {
            Self::Site => "site_settings",
            Self::Navigation => "navigation",
            Self::Faq => "faq",
            Self::Modules => "modules",
        }
    }

    /// Endpoint name for locale-scoped content.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Navigation => "navigation",
            Self::Faq => "faq",
            Self::Modules => "modules",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// A single content lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRequest {
    /// What to load.
    pub kind: ContentKind,
    /// Locale for FAQ and module lists. Ignored for site and navigation.
    pub locale: Locale,
}

impl ContentRequest {
    /// Site settings request.
    #[must_use]
    pub fn site() -> Self {
        Self {
            kind: ContentKind::Site,
            locale: Locale::default(),
        }
    }

    /// Navigation request.
    #[must_use]
    pub fn navigation() -> Self {
        Self {
            kind: ContentKind::Navigation,
            locale: Locale::default(),
        }
    }

    /// FAQ list request for `locale`.
    #[must_use]
    pub fn faq(locale: Locale) -> Self {
        Self {
            kind: ContentKind::Faq,
            locale,
        }
    }

    /// Module list request for `locale`.
    #[must_use]
    pub fn modules(locale: Locale) -> Self {
        Self {
            kind: ContentKind::Modules,
            locale,
        }
    }

    /// Cache key for this request.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self.kind {
            ContentKind::Site => SITE_DATA_KEY.to_owned(),
            ContentKind::Navigation => NAVIGATION_DATA_KEY.to_owned(),
            ContentKind::Faq | ContentKind::Modules => {
                locale_key(self.locale, self.kind.endpoint())
            }
        }
    }
}

impl fmt::Display for ContentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ContentKind::Site | ContentKind::Navigation => write!(f, "{}", self.kind),
            ContentKind::Faq | ContentKind::Modules => write!(f, "{}/{}", self.locale, self.kind),
        }
    }
}

/// Backend that can produce content envelopes.
pub trait ContentSource: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Whether this source can answer requests of `kind` at all.
    ///
    /// The adapter skips sources that cannot.
    fn serves(&self, kind: ContentKind) -> bool;

    /// Fetch the envelope for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the backend is unreachable, answers with an
    /// error status or returns an unusable payload.
    fn fetch(&self, request: &ContentRequest) -> Result<Value, ContentError>;
}

/// Wrap `payload` under the envelope key for `kind`.
pub(crate) fn envelope(kind: ContentKind, payload: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(kind.envelope_key().to_owned(), payload);
    Value::Object(map)
}

/// Require `value` to be a JSON object.
pub(crate) fn require_object(value: Value, origin: &str) -> Result<Value, ContentError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(ContentError::InvalidPayload(origin.to_owned()))
    }
}
