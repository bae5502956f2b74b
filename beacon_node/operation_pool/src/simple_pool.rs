use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// A bounded set of operations keyed by a canonical id, for the mempools that don't need
/// aggregation (proposer slashings, attester slashings, voluntary exits, transfers): duplicates
/// under the same key are dropped rather than merged.
pub struct SimplePool<K, V> {
    items: RwLock<HashMap<K, V>>,
    max_size: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> SimplePool<K, V> {
    pub fn new(max_size: usize) -> Self {
        SimplePool {
            items: RwLock::new(HashMap::new()),
            max_size,
        }
    }

    /// Inserts `value` under `key` unless it's already present or the pool is full.
    /// Returns `true` if the value was newly inserted.
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut items = self.items.write();
        if items.contains_key(&key) || items.len() >= self.max_size {
            return false;
        }
        items.insert(key, value);
        true
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.items.write().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.read().contains_key(key)
    }

    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&self, f: F) {
        self.items.write().retain(f)
    }

    pub fn values(&self) -> Vec<V> {
        self.items.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_dropped() {
        let pool: SimplePool<u64, &'static str> = SimplePool::new(10);
        assert!(pool.insert(1, "a"));
        assert!(!pool.insert(1, "b"));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn full_pool_rejects_new_keys() {
        let pool: SimplePool<u64, &'static str> = SimplePool::new(1);
        assert!(pool.insert(1, "a"));
        assert!(!pool.insert(2, "b"));
    }
}
