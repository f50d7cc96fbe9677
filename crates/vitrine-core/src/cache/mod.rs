//! Keyed collection cache shared between render paths and mutation callbacks.
//!
//! A single-owner key-value store behind an explicit interface: `get`, `set`
//! (full replace), and `invalidate` (mark stale). Writes replace a whole
//! cached page atomically under one lock, so readers never observe a
//! partially patched page. Locks are short and never held across await
//! points.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Page;

/// Cache key: (resource name, tenant scope, serialized filter + page).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub tenant: String,
    pub token: String,
}

impl QueryKey {
    #[must_use]
    pub fn new(resource: &'static str, tenant: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            resource,
            tenant: tenant.into(),
            token: token.into(),
        }
    }
}

/// Freshness of a cached page.
///
/// Stale pages stay readable; the next ensure-load refetches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    page: Page<T>,
    freshness: Freshness,
}

/// Mutex-guarded page cache.
///
/// The source environment could assume a single-threaded event loop; under
/// real parallelism every access goes through this one lock instead.
#[derive(Debug, Default)]
pub struct CollectionCache<T> {
    inner: Mutex<HashMap<QueryKey, CacheEntry<T>>>,
}

impl<T: Clone> CollectionCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Read the cached page for a key, fresh or stale.
    pub fn get(&self, key: &QueryKey) -> Option<Page<T>> {
        let guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.get(key).map(|entry| entry.page.clone())
    }

    /// Whether the key is absent or marked stale, i.e. needs a refetch.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        let guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        !matches!(
            guard.get(key).map(|entry| entry.freshness),
            Some(Freshness::Fresh)
        )
    }

    /// Replace the cached page for a key and mark it fresh.
    pub fn set(&self, key: QueryKey, page: Page<T>) -> Result<()> {
        if page.items.len() > page.page_size as usize {
            return Err(Error::PageOverflow {
                len: page.items.len(),
                page_size: page.page_size,
            });
        }
        debug!(token = %key.token, items = page.items.len(), "cache set");
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(
            key,
            CacheEntry {
                page,
                freshness: Freshness::Fresh,
            },
        );
        Ok(())
    }

    /// Mark a key stale without evicting it.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(entry) = guard.get_mut(key) {
            debug!(token = %key.token, "cache invalidate");
            entry.freshness = Freshness::Stale;
        }
    }

    /// Patch the first record matching `find` in place, atomically.
    ///
    /// Returns a clone of the record's state before the patch, or `None` when
    /// the key or record is absent. The pre-image is what a failed mutation
    /// rolls back to.
    pub fn patch_record(
        &self,
        key: &QueryKey,
        find: impl Fn(&T) -> bool,
        patch: impl FnOnce(&mut T),
    ) -> Option<T> {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = guard.get_mut(key)?;
        let record = entry.page.items.iter_mut().find(|item| find(item))?;
        let before = record.clone();
        patch(record);
        Some(before)
    }

    /// Whether any record matching `find` exists under the key.
    pub fn contains_record(&self, key: &QueryKey, find: impl Fn(&T) -> bool) -> bool {
        let guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .get(key)
            .is_some_and(|entry| entry.page.items.iter().any(|item| find(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(token: &str) -> QueryKey {
        QueryKey::new("promotions", "tenant-1", token)
    }

    #[test]
    fn set_then_get_round_trips() {
        let cache = CollectionCache::new();
        let page = Page::new(vec!["a", "b"], 2, 1, 10).unwrap();

        cache.set(key("t"), page.clone()).unwrap();
        assert_eq!(cache.get(&key("t")), Some(page));
        assert_eq!(cache.get(&key("other")), None);
    }

    #[test]
    fn set_rejects_oversized_page() {
        let cache = CollectionCache::new();
        let page = Page {
            items: vec![1, 2, 3],
            total_count: 3,
            page: 1,
            page_size: 2,
        };
        assert!(cache.set(key("t"), page).is_err());
    }

    #[test]
    fn invalidate_marks_stale_but_keeps_page_readable() {
        let cache = CollectionCache::new();
        let page = Page::new(vec![1], 1, 1, 10).unwrap();
        cache.set(key("t"), page.clone()).unwrap();

        assert!(!cache.needs_fetch(&key("t")));
        cache.invalidate(&key("t"));
        assert!(cache.needs_fetch(&key("t")));
        assert_eq!(cache.get(&key("t")), Some(page));
    }

    #[test]
    fn missing_key_needs_fetch() {
        let cache = CollectionCache::<u8>::new();
        assert!(cache.needs_fetch(&key("t")));
    }

    #[test]
    fn patch_record_returns_pre_image() {
        let cache = CollectionCache::new();
        let page = Page::new(vec![10, 20], 2, 1, 10).unwrap();
        cache.set(key("t"), page).unwrap();

        let before = cache.patch_record(&key("t"), |n| *n == 20, |n| *n = 99);
        assert_eq!(before, Some(20));
        assert_eq!(
            cache.get(&key("t")).unwrap().items,
            vec![10, 99]
        );

        let missing = cache.patch_record(&key("t"), |n| *n == 777, |n| *n = 0);
        assert_eq!(missing, None);
    }

    #[test]
    fn contains_record_checks_membership() {
        let cache = CollectionCache::new();
        let page = Page::new(vec![1, 2], 2, 1, 10).unwrap();
        cache.set(key("t"), page).unwrap();

        assert!(cache.contains_record(&key("t"), |n| *n == 2));
        assert!(!cache.contains_record(&key("t"), |n| *n == 5));
        assert!(!cache.contains_record(&key("x"), |n| *n == 2));
    }
}
