//! In-memory TTL cache for external API adapters.
//!
//! The TTL is checked on read; expired entries are not evicted otherwise, so
//! the map can grow without bound across distinct keys. In practice the
//! adapters only ever query "today" plus a handful of nearby dates.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("2024-01-01".to_string(), 42u32);

        assert_eq!(cache.get(&"2024-01-01".to_string()), Some(42));
    }

    #[test]
    fn test_miss_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_millis(0));
        cache.insert("2024-01-01".to_string(), 42u32);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"2024-01-01".to_string()), None);
        // Expired entries stay resident until overwritten.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unknown_key_is_miss() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"missing".to_string()), None);
    }
}
