//! LRU cache for resolved locales.
//!
//! Locale lookup normalizes the tag and clones a full table of names, so
//! repeated formatting with `[$-...]` tags goes through this cache instead.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::locale::Locale;

const CACHE_SIZE: usize = 100;

pub(crate) struct LocaleCache {
    inner: Mutex<LruCache<String, Arc<Locale>>>,
}

impl std::fmt::Debug for LocaleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCache").finish_non_exhaustive()
    }
}

impl LocaleCache {
    pub(crate) fn new() -> Self {
        let size = NonZeroUsize::new(CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(size)),
        }
    }

    pub(crate) fn get(&self, tag: &str) -> Option<Arc<Locale>> {
        match self.inner.lock() {
            Ok(mut cache) => cache.get(tag).cloned(),
            Err(_) => None,
        }
    }

    pub(crate) fn put(&self, tag: String, locale: Arc<Locale>) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(tag, locale);
        }
    }
}
