use crate::error::ArchiveResult;

/// Raw key-value storage backend for the archive.
///
/// All implementations must satisfy these invariants:
/// - A completed `put` is durable before the call returns.
/// - `get` of a missing key is `Ok(None)`, never an error.
/// - `delete` is idempotent and reports whether the key existed.
/// - `list` returns pairs sorted by key.
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> ArchiveResult<Option<Vec<u8>>>;

    /// Write (create or replace) the value at `key`.
    fn put(&self, key: &str, value: &[u8]) -> ArchiveResult<()>;

    /// Delete the value at `key`.
    ///
    /// Returns `Ok(true)` if the key existed, `Ok(false)` otherwise.
    fn delete(&self, key: &str) -> ArchiveResult<bool>;

    /// List all pairs whose key starts with `prefix`, sorted by key.
    ///
    /// Pass `""` to list everything.
    fn list(&self, prefix: &str) -> ArchiveResult<Vec<(String, Vec<u8>)>>;
}
