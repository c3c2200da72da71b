use crate::blob::Blob;
use crate::error::MediaResult;

/// Keyed binary object storage.
///
/// All implementations must satisfy these invariants:
/// - Objects are written whole; a completed `put` is durable before the
///   call returns.
/// - `get` of a missing key is `Ok(None)`, never an error.
/// - `delete` is idempotent and reports whether the key existed.
/// - Concurrent reads of the same key are always safe.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Write (create or replace) the blob at `key`.
    fn put(&self, key: &str, blob: &Blob) -> MediaResult<()>;

    /// Read the blob at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> MediaResult<Option<Blob>>;

    /// Delete the blob at `key`.
    ///
    /// Returns `Ok(true)` if the key existed, `Ok(false)` otherwise.
    fn delete(&self, key: &str) -> MediaResult<bool>;
}
