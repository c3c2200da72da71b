//! Filesystem-backed key-value store.
//!
//! [`FsKvStore`] keeps one file per key under a root directory. Keys are
//! percent-encoded into file names so opaque client ids can never escape the
//! root or collide with each other. Writes go through a temp file and an
//! atomic rename, so a crashed write leaves either the old value or the new
//! one, never a torn record.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{ArchiveError, ArchiveResult};
use crate::traits::KvStore;

/// A [`KvStore`] persisting each key as a file under a root directory.
#[derive(Debug)]
pub struct FsKvStore {
    root: PathBuf,
}

impl FsKvStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> ArchiveResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

/// Encode a key into a filesystem-safe file name.
///
/// Alphanumerics, `-`, and `_` pass through; every other byte becomes `%XX`.
/// The encoding is total and injective, so any key string is representable
/// and no two keys share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Decode a file name produced by [`encode_key`].
///
/// Returns `None` for names this store did not write (foreign files are
/// skipped during listing rather than treated as corruption).
fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3)?;
                let hex = std::str::from_utf8(hex).ok()?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b @ (b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_') => {
                out.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

impl KvStore for FsKvStore {
    fn get(&self, key: &str) -> ArchiveResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> ArchiveResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value)?;
        tmp.persist(self.path_for(key))
            .map_err(|err| ArchiveError::StorageUnavailable(err.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> ArchiveResult<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self, prefix: &str) -> ArchiveResult<Vec<(String, Vec<u8>)>> {
        let mut pairs = Vec::new();
        for dir_entry in fs::read_dir(&self.root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(key) = decode_key(name) else { continue };
            if !key.starts_with(prefix) {
                continue;
            }
            pairs.push((key, fs::read(dir_entry.path())?));
        }
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(pairs)
    }
}
