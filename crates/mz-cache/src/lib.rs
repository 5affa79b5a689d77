//! Content cache for the Maklerzentrum content core.
//!
//! The [`ContentCache`] trait decouples the CMS adapter from the storage used
//! for previously fetched payloads. Entries live for the lifetime of the cache
//! value: there is no expiry and no eviction, only an explicit [`clear`].
//!
//! # Implementations
//!
//! - [`MemoryCache`]: in-memory map keyed by content key
//! - [`NullCache`]: no-op implementation (always misses), used when caching is
//!   disabled
//!
//! # Example
//!
//! ```
//! use mz_cache::{ContentCache, MemoryCache, SITE_DATA_KEY};
//! use serde_json::json;
//!
//! let cache = MemoryCache::new();
//! cache.set(SITE_DATA_KEY, json!({"site_settings": {"brandName": "MZ"}}));
//! assert!(cache.get(SITE_DATA_KEY).is_some());
//! cache.clear();
//! assert!(cache.get(SITE_DATA_KEY).is_none());
//! ```
//!
//! [`clear`]: ContentCache::clear

mod keys;

pub use keys::{NAVIGATION_DATA_KEY, SITE_DATA_KEY, locale_key};

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// Store for previously fetched content payloads.
///
/// Writes overwrite any existing entry for the same key (last writer wins).
pub trait ContentCache: Send + Sync {
    /// Retrieve the payload stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `payload` under `key`.
    fn set(&self, key: &str, payload: Value);

    /// Remove every entry.
    fn clear(&self);
}

/// In-memory [`ContentCache`].
///
/// Unbounded; in practice holds two global keys plus one entry per
/// locale/endpoint combination. A poisoned lock is recovered, not propagated.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, payload: Value) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), payload);
    }

    fn clear(&self) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        entries.clear();
        tracing::debug!(entries = count, "content cache cleared");
    }
}

/// No-op [`ContentCache`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
pub struct NullCache;

impl ContentCache for NullCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _payload: Value) {}

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_cache_miss_then_hit() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get(SITE_DATA_KEY), None);

        cache.set(SITE_DATA_KEY, json!({"site_settings": {}}));
        assert_eq!(cache.get(SITE_DATA_KEY), Some(json!({"site_settings": {}})));
    }

    #[test]
    fn test_memory_cache_survives_poisoned_lock() {
        let cache = std::sync::Arc::new(MemoryCache::new());
        cache.set(SITE_DATA_KEY, json!({"site_settings": {}}));

        let writer = std::sync::Arc::clone(&cache);
        let result = std::thread::spawn(move || {
            let _guard = writer.entries.write().unwrap();
            panic!("writer failed while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(cache.entries.is_poisoned());

        assert_eq!(cache.get(SITE_DATA_KEY), Some(json!({"site_settings": {}})));
        cache.set("de-CH_faq", json!([]));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_last_writer_wins() {
        let cache = MemoryCache::new();
        cache.set(NAVIGATION_DATA_KEY, json!({"navigation": {"main": []}}));
        cache.set(NAVIGATION_DATA_KEY, json!({"navigation": {}}));

        assert_eq!(cache.get(NAVIGATION_DATA_KEY), Some(json!({"navigation": {}})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_clear_removes_all_keys() {
        let cache = MemoryCache::new();
        cache.set(SITE_DATA_KEY, json!(1));
        cache.set("de-CH_faq", json!([]));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("de-CH_faq"), None);
    }

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        cache.set(SITE_DATA_KEY, json!({"site_settings": {}}));
        assert_eq!(cache.get(SITE_DATA_KEY), None);
    }
}
