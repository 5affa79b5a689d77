//! Tiered content retrieval.

use std::fmt;
use std::sync::Arc;

use mz_cache::{ContentCache, MemoryCache, NullCache};
use mz_config::{Config, Locale};
use serde_json::{Map, Value};

use crate::fallback::fallback_envelope;
use crate::http::{HttpClient, UreqClient};
use crate::source::{
    ContentApiSource, ContentKind, ContentRequest, ContentSource, DirectusSource, StaticSource,
};

/// Where a resolved envelope came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Served from the content cache.
    Cache,
    /// Fetched from the named source.
    Source(String),
    /// Built-in fallback after every source failed.
    Fallback,
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => f.write_str("cache"),
            Self::Source(name) => write!(f, "source {name}"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// A resolved content envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Envelope, e.g. `{"site_settings": {...}}`.
    pub envelope: Value,
    /// Where it came from.
    pub origin: ContentOrigin,
}

impl Resolved {
    /// Payload under the envelope key for `kind`, or `Null` if absent.
    #[must_use]
    pub fn payload(&self, kind: ContentKind) -> &Value {
        self.envelope.get(kind.envelope_key()).unwrap_or(&Value::Null)
    }
}

/// CMS adapter.
///
/// Every lookup runs the same chain and stops at the first success:
///
/// 1. the content cache;
/// 2. each configured [`ContentSource`] in order, skipping sources that do not
///    serve the request kind;
/// 3. the built-in fallback.
///
/// Successful fetches are cached; fallbacks are not, so the next lookup tries
/// the sources again. None of the lookup methods fail.
pub struct CmsAdapter {
    sources: Vec<Box<dyn ContentSource>>,
    cache: Arc<dyn ContentCache>,
}

impl CmsAdapter {
    /// Create an adapter with no sources.
    #[must_use]
    pub fn new(cache: Arc<dyn ContentCache>) -> Self {
        Self {
            sources: Vec::new(),
            cache,
        }
    }

    /// Append a source to the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl ContentSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Build the adapter described by `config`, using a `ureq` HTTP client.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let client: Arc<dyn HttpClient> = Arc::new(UreqClient::new(config.http_timeout()));
        Self::from_config_with_client(config, client)
    }

    /// Build the adapter described by `config` with the given HTTP client.
    ///
    /// Mock mode reads static JSON from the content directory; live mode
    /// queries Directus. The content API is appended when configured.
    #[must_use]
    pub fn from_config_with_client(config: &Config, client: Arc<dyn HttpClient>) -> Self {
        let cache: Arc<dyn ContentCache> = if config.cache.enabled {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(NullCache)
        };

        let mut adapter = Self::new(cache);
        if config.is_mock_mode() {
            adapter = adapter.with_source(StaticSource::new(&config.content_dir));
        } else {
            adapter = adapter.with_source(DirectusSource::new(
                Arc::clone(&client),
                &config.cms.directus_url,
                config.cms.public_token.clone(),
            ));
        }
        if let Some(api) = &config.content_api {
            adapter = adapter.with_source(ContentApiSource::new(
                client,
                &api.base_url,
                api.admin_token().map(str::to_owned),
            ));
        }

        tracing::debug!(sources = ?adapter.source_names(), "CMS adapter configured");
        adapter
    }

    /// Names of the configured sources, in lookup order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve `request` through cache, sources and fallback.
    pub fn resolve(&self, request: &ContentRequest) -> Resolved {
        let key = request.cache_key();
        if let Some(envelope) = self.cache.get(&key) {
            return Resolved {
                envelope,
                origin: ContentOrigin::Cache,
            };
        }

        for source in self.sources.iter().filter(|s| s.serves(request.kind)) {
            match source.fetch(request) {
                Ok(envelope) => {
                    tracing::debug!(source = source.name(), "Loaded {request}");
                    self.cache.set(&key, envelope.clone());
                    return Resolved {
                        envelope,
                        origin: ContentOrigin::Source(source.name().to_owned()),
                    };
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "Failed to load {request}");
                }
            }
        }

        tracing::error!("All content sources failed for {request}, using fallback");
        Resolved {
            envelope: fallback_envelope(request.kind),
            origin: ContentOrigin::Fallback,
        }
    }

    /// Site settings payload (`{}` if absent).
    pub fn get_site(&self) -> Value {
        object_payload(&self.resolve(&ContentRequest::site()), ContentKind::Site)
    }

    /// Navigation payload (`{}` if absent).
    pub fn get_navigation(&self) -> Value {
        object_payload(
            &self.resolve(&ContentRequest::navigation()),
            ContentKind::Navigation,
        )
    }

    /// FAQ entries for `locale` (empty if absent).
    pub fn load_faqs(&self, locale: Locale) -> Vec<Value> {
        list_payload(&self.resolve(&ContentRequest::faq(locale)), ContentKind::Faq)
    }

    /// Module entries for `locale` (empty if absent).
    pub fn load_modules(&self, locale: Locale) -> Vec<Value> {
        list_payload(
            &self.resolve(&ContentRequest::modules(locale)),
            ContentKind::Modules,
        )
    }

    /// Clear the cache and re-fetch site settings.
    ///
    /// Returns the fresh site settings envelope.
    pub fn refresh(&self) -> Value {
        self.clear_cache();
        self.resolve(&ContentRequest::site()).envelope
    }

    /// Empty the content cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("CMS cache cleared");
    }
}

/// Object payload for `kind`; missing or non-object payloads become `{}`.
fn object_payload(resolved: &Resolved, kind: ContentKind) -> Value {
    match resolved.payload(kind) {
        Value::Object(map) => Value::Object(map.clone()),
        _ => Value::Object(Map::new()),
    }
}

/// List payload for `kind`; missing or non-array payloads become empty.
fn list_payload(resolved: &Resolved, kind: ContentKind) -> Vec<Value> {
    resolved
        .payload(kind)
        .as_array()
        .cloned()
        .unwrap_or_default()
}
