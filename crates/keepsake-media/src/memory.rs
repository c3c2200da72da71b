use std::collections::HashMap;
use std::sync::RwLock;

use crate::blob::Blob;
use crate::error::MediaResult;
use crate::traits::BlobStore;

/// In-memory, `HashMap`-based blob store.
///
/// Intended for tests and sandboxed embedding. Blobs hold their data in
/// `Bytes`, so clones on read are cheap reference bumps.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(Blob::size)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, key: &str, blob: &Blob) -> MediaResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.insert(key.to_string(), blob.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> MediaResult<Option<Blob>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn delete(&self, key: &str) -> MediaResult<bool> {
        let mut map = self.blobs.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn make_blob(content: &'static [u8]) -> Blob {
        Blob::new(Bytes::from_static(content), Some("image/png".into()))
    }

    #[test]
    fn put_and_get_roundtrip() {
        let store = InMemoryBlobStore::new();
        let blob = make_blob(b"pixels");
        store.put("image/a.png", &blob).unwrap();

        let read_back = store.get("image/a.png").unwrap().expect("should exist");
        assert_eq!(read_back, blob);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.get("image/ghost.png").unwrap().is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryBlobStore::new();
        store.put("k", &make_blob(b"x")).unwrap();
        assert!(store.delete("k").unwrap());
        assert!(!store.delete("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn total_bytes_sums_blob_sizes() {
        let store = InMemoryBlobStore::new();
        store.put("a", &make_blob(b"12345")).unwrap();
        store.put("b", &make_blob(b"123456789")).unwrap();
        assert_eq!(store.total_bytes(), 14);
        assert_eq!(store.len(), 2);
    }
}
