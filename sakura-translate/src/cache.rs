//! Bounded, recency-ordered translation cache. No TTL; entries live until
//! evicted or the process restarts.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

#[derive(Debug)]
pub struct TranslationCache {
    inner: Mutex<LruCache<String, String>>,
}

impl TranslationCache {
    /// Capacity is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a translation, promoting it to most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    /// Insert or replace an entry. Past capacity, the least recently used
    /// entry is evicted.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().put(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::TranslationCache;

    #[test]
    fn inserting_past_capacity_evicts_oldest() {
        let cache = TranslationCache::new(3);
        cache.put("ja:a", "あ");
        cache.put("ja:b", "b");
        cache.put("ja:c", "c");
        cache.put("ja:d", "d");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("ja:a"), None);
        assert_eq!(cache.get("ja:b").as_deref(), Some("b"));
        assert_eq!(cache.get("ja:c").as_deref(), Some("c"));
        assert_eq!(cache.get("ja:d").as_deref(), Some("d"));
    }

    #[test]
    fn get_promotes_entry() {
        let cache = TranslationCache::new(3);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("c", "3");

        assert_eq!(cache.get("a").as_deref(), Some("1"));
        cache.put("d", "4");

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a").as_deref(), Some("1"));
        assert_eq!(cache.get("c").as_deref(), Some("3"));
        assert_eq!(cache.get("d").as_deref(), Some("4"));
    }

    #[test]
    fn missed_get_does_not_save_an_evicted_entry() {
        let cache = TranslationCache::new(2);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("c", "3");

        assert_eq!(cache.get("a"), None);
        cache.put("d", "4");

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c").as_deref(), Some("3"));
        assert_eq!(cache.get("d").as_deref(), Some("4"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn put_on_existing_key_updates_and_promotes() {
        let cache = TranslationCache::new(2);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("a", "10");
        cache.put("c", "3");

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a").as_deref(), Some("10"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let cache = TranslationCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.is_empty());

        cache.put("a", "1");
        cache.put("b", "2");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn miss_has_no_side_effect() {
        let cache = TranslationCache::new(2);
        cache.put("a", "1");
        assert_eq!(cache.get("zzz"), None);
        assert_eq!(cache.len(), 1);
    }
}
