//! Per-endpoint memoization of built documents.
//!
//! Entries live for the life of the process. There is no expiry and no
//! per-entry invalidation; live-reload mode bypasses the cache entirely so
//! edits show up on the next request.
//!
//! Two first requests for the same endpoint may both build; the last write
//! wins. Both builds produce the same document, so no lock is taken around
//! population.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// A cached value and when it was stored.
#[derive(Debug)]
pub struct CacheItem<T> {
    pub key: String,
    pub value: Arc<T>,
    pub created_on: SystemTime,
}

#[derive(Debug)]
pub struct DocumentCache<T = crate::synth::ApiDocument> {
    items: DashMap<String, CacheItem<T>>,
    live_reload: bool,
}

impl<T> DocumentCache<T> {
    pub fn new(live_reload: bool) -> Self {
        Self {
            items: DashMap::new(),
            live_reload,
        }
    }

    pub fn is_live_reload(&self) -> bool {
        self.live_reload
    }

    /// Return the cached value for `key`, building and storing it on a miss.
    ///
    /// Builder errors are returned as-is and nothing is stored.
    pub fn get_or_build<E, F>(&self, key: &str, builder: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.live_reload {
            return builder().map(Arc::new);
        }
        if let Some(value) = self.get(key) {
            debug!(key, "document cache hit");
            return Ok(value);
        }

        let value = Arc::new(builder()?);
        self.items.insert(
            key.to_string(),
            CacheItem {
                key: key.to_string(),
                value: Arc::clone(&value),
                created_on: SystemTime::now(),
            },
        );
        debug!(key, "document cached");
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        if self.live_reload {
            return None;
        }
        self.items.get(key).map(|item| Arc::clone(&item.value))
    }

    /// When the entry for `key` was stored.
    pub fn created_on(&self, key: &str) -> Option<SystemTime> {
        self.items.get(key).map(|item| item.created_on)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_builds_once() {
        let cache: DocumentCache<String> = DocumentCache::new(false);
        let calls = Cell::new(0);
        let build = || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(format!("doc {}", calls.get()))
        };

        let first = cache.get_or_build("swagger", build).unwrap();
        let second = cache.get_or_build("swagger", build).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.created_on("swagger").is_some());
    }

    #[test]
    fn test_live_reload_always_builds() {
        let cache: DocumentCache<u32> = DocumentCache::new(true);
        let calls = Cell::new(0);
        for _ in 0..3 {
            cache
                .get_or_build("swagger", || {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>(calls.get())
                })
                .unwrap();
        }
        assert_eq!(calls.get(), 3);
        assert!(cache.is_empty());
        assert!(cache.get("swagger").is_none());
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let cache: DocumentCache<u32> = DocumentCache::new(false);
        assert!(cache.get_or_build("a", || Err("boom")).is_err());
        assert!(cache.is_empty());
        assert_eq!(*cache.get_or_build("a", || Ok::<_, &str>(7)).unwrap(), 7);
    }
}
