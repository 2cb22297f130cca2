//! An owned least-recently-used cache.
//!
//! Held by value inside the font manager and the text shaper rather than
//! living as a process-wide table: eviction is a method on the cache an
//! owner already holds, so there is no free-standing eviction entry point to
//! misuse.

use std::collections::HashMap;
use std::hash::Hash;

struct Entry<V> {
    value: V,
    last_access: u64,
}

/// A bounded map evicting least-recently-used entries.
///
/// Recency is a monotonic access stamp, not wall-clock time, so behavior is
/// deterministic and identical on every platform.
pub struct LruCache<K, V> {
    map: HashMap<K, Entry<V>>,
    stamp: u64,
    max_entries: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            map: HashMap::new(),
            stamp: 0,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Looks up `key`, bumping its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.stamp += 1;
        let stamp = self.stamp;
        self.map.get_mut(key).map(|entry| {
            entry.last_access = stamp;
            &entry.value
        })
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts or replaces an entry at current recency. The caller is
    /// expected to follow with [`evict_over_capacity`](Self::evict_over_capacity).
    pub fn insert(&mut self, key: K, value: V) {
        self.stamp += 1;
        self.map.insert(
            key,
            Entry {
                value,
                last_access: self.stamp,
            },
        );
    }

    /// Evicts least-recently-used entries until at or under capacity,
    /// skipping entries `can_evict` rejects. Returns the evicted count.
    pub fn evict_over_capacity<F>(&mut self, can_evict: F) -> usize
    where
        F: Fn(&V) -> bool,
    {
        if self.map.len() <= self.max_entries {
            return 0;
        }

        let mut by_age: Vec<(K, u64)> = self
            .map
            .iter()
            .map(|(k, e)| (k.clone(), e.last_access))
            .collect();
        by_age.sort_by_key(|(_, stamp)| *stamp);

        let mut evicted = 0;
        for (key, _) in by_age {
            if self.map.len() <= self.max_entries {
                break;
            }
            let evictable = self.map.get(&key).is_some_and(|e| can_evict(&e.value));
            if evictable {
                self.map.remove(&key);
                evicted += 1;
            }
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bumps_recency() {
        let mut cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Touch "a" so "b" becomes the LRU entry.
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);

        let evicted = cache.evict_over_capacity(|_| true);
        assert_eq!(evicted, 1);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn test_eviction_respects_guard() {
        let mut cache = LruCache::new(1);
        cache.insert("pinned", 1);
        cache.insert("free", 2);

        let evicted = cache.evict_over_capacity(|v| *v != 1);
        assert_eq!(evicted, 1);
        assert!(cache.contains(&"pinned"));
        assert!(!cache.contains(&"free"));
    }

    #[test]
    fn test_no_eviction_under_capacity() {
        let mut cache = LruCache::new(4);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.evict_over_capacity(|_| true), 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_multiple_until_under_limit() {
        let mut cache = LruCache::new(2);
        for i in 0..5 {
            cache.insert(i, i);
        }
        let evicted = cache.evict_over_capacity(|_| true);
        assert_eq!(evicted, 3);
        assert_eq!(cache.len(), 2);
        // The most recently inserted entries survive.
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }
}
