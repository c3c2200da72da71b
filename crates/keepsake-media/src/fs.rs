//! Filesystem-backed blob store.
//!
//! [`FsBlobStore`] keeps each blob as a data file plus a `.meta` JSON
//! sidecar (content type and ETag) under a root directory, laid out by the
//! key's `category/filename` segments. Keys are validated against a safe
//! character set before any path is built, so a hostile key can never
//! escape the root.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::blob::{Blob, BlobMeta};
use crate::error::{MediaError, MediaResult};
use crate::traits::BlobStore;

const META_SUFFIX: &str = ".meta";

/// A [`BlobStore`] persisting blobs as files under a root directory.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> MediaResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> MediaResult<PathBuf> {
        validate_key(key)?;
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        Ok(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> MediaResult<()> {
        let parent = path
            .parent()
            .ok_or_else(|| MediaError::InvalidKey("key has no parent directory".into()))?;
        fs::create_dir_all(parent)?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(bytes)?;
        tmp.persist(path)
            .map_err(|err| MediaError::StorageUnavailable(err.to_string()))?;
        Ok(())
    }
}

/// Reject keys that could traverse outside the store root.
///
/// Valid keys are one or more `/`-separated segments of `[A-Za-z0-9._-]`
/// characters, none empty, none starting with a dot.
fn validate_key(key: &str) -> MediaResult<()> {
    let invalid = || MediaError::InvalidKey(key.to_string());
    if key.is_empty() {
        return Err(invalid());
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment.starts_with('.') {
            return Err(invalid());
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        {
            return Err(invalid());
        }
    }
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, blob: &Blob) -> MediaResult<()> {
        let data_path = self.path_for(key)?;
        let meta = BlobMeta {
            content_type: blob.content_type.clone(),
            etag: blob.etag.clone(),
        };
        // Data first, then the sidecar; a crash between the two leaves a
        // readable blob whose metadata gets recomputed on read.
        self.write_atomic(&data_path, &blob.data)?;
        let meta_path = meta_path_of(&data_path);
        self.write_atomic(&meta_path, &serde_json::to_vec(&meta)?)?;
        Ok(())
    }

    fn get(&self, key: &str) -> MediaResult<Option<Blob>> {
        let data_path = self.path_for(key)?;
        let data = match fs::read(&data_path) {
            Ok(bytes) => Bytes::from(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let blob = match fs::read(meta_path_of(&data_path)) {
            Ok(meta_bytes) => {
                let meta: BlobMeta = serde_json::from_slice(&meta_bytes)?;
                Blob::from_parts(data, meta.content_type, meta.etag)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(key, "blob has no metadata sidecar, recomputing");
                Blob::new(data, None)
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Some(blob))
    }

    fn delete(&self, key: &str) -> MediaResult<bool> {
        let data_path = self.path_for(key)?;
        let _ = fs::remove_file(meta_path_of(&data_path));
        match fs::remove_file(&data_path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

fn meta_path_of(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_os_string();
    name.push(META_SUFFIX);
    PathBuf::from(name)
}
