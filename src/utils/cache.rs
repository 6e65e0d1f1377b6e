use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-process memo with TTL. Entries live only as long as the process does.
pub struct Cache<K, V> {
    data: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entry = self.data.get(key)?;
            if Instant::now() <= entry.expires_at {
                return Some(entry.value.clone());
            }
        }
        // Only drop the entry if it is still stale; a concurrent insert may have refreshed it.
        self.data
            .remove_if(key, |_, entry| Instant::now() > entry.expires_at);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.data.insert(key, CacheEntry { value, expires_at });
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            ttl: self.ttl,
        }
    }
}
