use parking_lot::RwLock;
use std::collections::HashMap;

/// The byte-oriented seam every concrete backend (in-memory here; LevelDB/RocksDB in a real
/// deployment) implements, so `BeaconStore` never has to know which one it's layered over.
pub trait KeyValueStore: Send + Sync {
    fn get_bytes(&self, column: &str, key: &[u8]) -> Option<Vec<u8>>;
    fn put_bytes(&self, column: &str, key: &[u8], value: &[u8]);
    fn key_exists(&self, column: &str, key: &[u8]) -> bool;
    fn delete(&self, column: &str, key: &[u8]);
}

/// An in-process `KeyValueStore`, namespaced by column so blocks and states never collide even
/// when (as with SSZ roots) their keys happen to be the same bytes.
#[derive(Default)]
pub struct MemoryStore {
    columns: RwLock<HashMap<String, HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn open() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_bytes(&self, column: &str, key: &[u8]) -> Option<Vec<u8>> {
        self.columns.read().get(column).and_then(|c| c.get(key).cloned())
    }

    fn put_bytes(&self, column: &str, key: &[u8], value: &[u8]) {
        self.columns
            .write()
            .entry(column.to_string())
            .or_default()
            .insert(key.to_vec(), value.to_vec());
    }

    fn key_exists(&self, column: &str, key: &[u8]) -> bool {
        self.columns
            .read()
            .get(column)
            .map_or(false, |c| c.contains_key(key))
    }

    fn delete(&self, column: &str, key: &[u8]) {
        if let Some(c) = self.columns.write().get_mut(column) {
            c.remove(key);
        }
    }
}
