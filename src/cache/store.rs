//! Cache Store Module
//!
//! Unbounded expiring key-value store. Entries leave either when a read finds
//! them stale or when `cleanup` sweeps them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, ReadOutcome, SystemClock};

// == Cache Store ==
/// Expiring key-value store with per-entry TTL.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Time source for stamping and expiry checks
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and restarting
    /// its TTL window.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.entries.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns a clone of the value if the entry exists and is fresh.
    ///
    /// This read has a side effect: a stale entry is removed from the store
    /// before `None` is returned.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.stats.record_read(ReadOutcome::Hit);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_read(ReadOutcome::Expired);
        } else {
            self.stats.record_read(ReadOutcome::Miss);
        }
        None
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidated(count);
        count
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        self.stats.record_invalidated(removed);
        removed
    }

    // == Cleanup ==
    /// Removes all expired entries, read or not.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_swept(removed);
        removed
    }

    /// Counts a read that the caller answered without the store's help
    /// because the backend failed.
    pub fn record_fallback(&mut self) {
        self.stats.record_fallback();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn manual_store() -> (Arc<ManualClock>, CacheStore<Vec<i32>>) {
        let clock = Arc::new(ManualClock::starting_now());
        let store = CacheStore::with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (_, mut store) = manual_store();

        store.set("key1", vec![1], Duration::minutes(5));
        assert_eq!(store.get("key1"), Some(vec![1]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (_, mut store) = manual_store();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_keeps_empty_values_verbatim() {
        let (_, mut store) = manual_store();

        store.set("empty", Vec::new(), Duration::minutes(5));
        assert_eq!(store.get("empty"), Some(Vec::new()));
    }

    #[test]
    fn test_store_overwrite() {
        let (_, mut store) = manual_store();

        store.set("key1", vec![1], Duration::minutes(5));
        store.set("key1", vec![2], Duration::minutes(5));

        assert_eq!(store.get("key1"), Some(vec![2]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_scenario() {
        let (clock, mut store) = manual_store();

        store.set("k", vec![1, 2, 3], Duration::minutes(1));

        clock.advance(Duration::seconds(30));
        assert_eq!(store.get("k"), Some(vec![1, 2, 3]));

        clock.advance(Duration::seconds(31));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_store_get_removes_stale_entry() {
        let (clock, mut store) = manual_store();

        store.set("k", vec![1], Duration::seconds(10));
        clock.advance(Duration::seconds(11));

        // The read itself evicts the stale entry
        assert_eq!(store.get("k"), None);
        assert!(!store.contains_key("k"));
        assert_eq!(store.cleanup(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_set_after_expiry_starts_fresh_window() {
        let (clock, mut store) = manual_store();

        store.set("k", vec![1], Duration::seconds(10));
        clock.advance(Duration::seconds(11));
        assert_eq!(store.get("k"), None);

        store.set("k", vec![2], Duration::seconds(10));
        clock.advance(Duration::seconds(9));
        assert_eq!(store.get("k"), Some(vec![2]));
    }

    #[test]
    fn test_store_zero_ttl_never_served() {
        let (_, mut store) = manual_store();

        store.set("k", vec![1], Duration::zero());
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear() {
        let (_, mut store) = manual_store();

        store.set("a", vec![1], Duration::minutes(5));
        store.set("b", vec![2], Duration::minutes(5));

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_store_invalidate_prefix() {
        let (_, mut store) = manual_store();

        store.set("tools:all{}", vec![1], Duration::minutes(5));
        store.set("tools:latest{\"limit\":5}", vec![2], Duration::minutes(5));
        store.set("blogs:all{}", vec![3], Duration::minutes(5));

        assert_eq!(store.invalidate_prefix("tools:"), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("blogs:all{}"), Some(vec![3]));
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (clock, mut store) = manual_store();

        store.set("short", vec![1], Duration::seconds(1));
        store.set("long", vec![2], Duration::seconds(10));

        clock.advance(Duration::seconds(2));

        assert_eq!(store.cleanup(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long"), Some(vec![2]));
    }

    #[test]
    fn test_store_stats() {
        let (_, mut store) = manual_store();

        store.set("key1", vec![1], Duration::minutes(5));
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
