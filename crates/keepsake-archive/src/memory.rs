use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::ArchiveResult;
use crate::traits::KvStore;

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. All values are held in memory behind a
/// `RwLock` for safe concurrent access; the `BTreeMap` gives `list` its
/// sorted-by-key ordering for free.
pub struct InMemoryKvStore {
    values: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> ArchiveResult<Option<Vec<u8>>> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> ArchiveResult<()> {
        let mut map = self.values.write().expect("lock poisoned");
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> ArchiveResult<bool> {
        let mut map = self.values.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn list(&self, prefix: &str) -> ArchiveResult<Vec<(String, Vec<u8>)>> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .finish()
    }
}
