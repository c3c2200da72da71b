//! The [`MediaStore`]: upload policy, key generation, and range-aware reads
//! over a pluggable [`BlobStore`] backend.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blob::{category_for, resolve_content_type, Blob};
use crate::error::{MediaError, MediaResult};
use crate::range::ByteRange;
use crate::traits::BlobStore;

/// Longest sanitized filename stem carried into a generated key.
const MAX_STEM_LEN: usize = 40;

/// Upload policy for a [`MediaStore`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Uploads larger than this are rejected before any storage write.
    pub max_upload_bytes: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Result of an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The blob is durably stored and retrievable at `url`.
    Stored { key: String, url: String },
    /// No durable backend is configured; nothing was stored. The caller
    /// should keep the entry with only its locally generated preview.
    Sandboxed,
}

/// How a read's body relates to the whole object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// The body is the entire object.
    Full,
    /// The body is a byte subrange; serve with 206 and this `Content-Range`.
    Partial { content_range: String },
}

/// A satisfied media read, ready to be turned into an HTTP response.
///
/// Both full and partial reads should advertise `Accept-Ranges: bytes` and
/// an immutable long-lived cache directive: keys are never reused for
/// different content.
#[derive(Clone, Debug)]
pub struct MediaRead {
    pub status: ReadStatus,
    pub content_type: String,
    pub etag: String,
    /// Size of the whole object, regardless of how much the body carries.
    pub total_size: u64,
    pub body: Bytes,
}

impl MediaRead {
    /// The `Content-Length` of the response body.
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.status, ReadStatus::Partial { .. })
    }
}

/// Media upload and delivery over an optional blob backend.
///
/// Without a backend the store is *sandboxed*: uploads soft-succeed with
/// [`UploadOutcome::Sandboxed`] while reads fail with
/// [`MediaError::BackendUnconfigured`] -- asymmetric on purpose, so a flaky
/// or absent backend never blocks journaling, only defers durability of the
/// original-resolution asset.
pub struct MediaStore {
    backend: Option<Arc<dyn BlobStore>>,
    config: MediaConfig,
}

impl MediaStore {
    /// A store backed by durable blob storage.
    pub fn new(backend: Arc<dyn BlobStore>, config: MediaConfig) -> Self {
        Self {
            backend: Some(backend),
            config,
        }
    }

    /// A store with no durable backend (local/demo mode).
    pub fn sandboxed(config: MediaConfig) -> Self {
        Self {
            backend: None,
            config,
        }
    }

    /// The active upload policy.
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Store an upload under a freshly generated collision-resistant key.
    ///
    /// Empty and oversized payloads are rejected before any write. The key
    /// is namespaced by media category and embeds a sanitized slice of the
    /// original filename as a debugging aid.
    pub fn put(
        &self,
        data: Bytes,
        content_type: Option<&str>,
        suggested_name: &str,
    ) -> MediaResult<UploadOutcome> {
        if data.is_empty() {
            return Err(MediaError::EmptyUpload);
        }
        let size = data.len() as u64;
        if size > self.config.max_upload_bytes {
            return Err(MediaError::PayloadTooLarge {
                size,
                max: self.config.max_upload_bytes,
            });
        }
        let Some(backend) = &self.backend else {
            tracing::debug!(name = suggested_name, size, "sandboxed upload, nothing stored");
            return Ok(UploadOutcome::Sandboxed);
        };
        let key = generate_key(content_type, suggested_name);
        let blob = Blob::new(data, content_type.map(str::to_string));
        backend.put(&key, &blob)?;
        tracing::debug!(key, size, "stored media blob");
        let url = format!("/api/media/{key}");
        Ok(UploadOutcome::Stored { key, url })
    }

    /// Read an object, honoring an optional `Range` header value.
    ///
    /// Malformed range headers fall back to a full read; well-formed but
    /// out-of-bounds ranges fail with `RangeNotSatisfiable`.
    pub fn get(&self, key: &str, range_header: Option<&str>) -> MediaResult<MediaRead> {
        let backend = self.backend.as_ref().ok_or(MediaError::BackendUnconfigured)?;
        let blob = backend
            .get(key)?
            .ok_or_else(|| MediaError::NotFound(key.to_string()))?;
        let size = blob.size();
        let content_type = resolve_content_type(blob.content_type.as_deref(), key);

        let range = match range_header {
            Some(header) => ByteRange::parse(header, size)?,
            None => None,
        };
        let read = match range {
            Some(range) => MediaRead {
                status: ReadStatus::Partial {
                    content_range: range.content_range(size),
                },
                content_type,
                etag: blob.etag,
                total_size: size,
                body: blob
                    .data
                    .slice(range.start as usize..range.end as usize + 1),
            },
            None => MediaRead {
                status: ReadStatus::Full,
                content_type,
                etag: blob.etag,
                total_size: size,
                body: blob.data,
            },
        };
        Ok(read)
    }

    /// Delete an object; deleting a missing key (or with no backend) is a
    /// no-op.
    pub fn delete(&self, key: &str) -> MediaResult<bool> {
        match &self.backend {
            Some(backend) => backend.delete(key),
            None => Ok(false),
        }
    }
}

/// Build a key of the form `{category}/{stem}-{uuid}.{ext}`.
///
/// The category comes from the content type (or the filename extension when
/// no type was supplied); the stem and extension are sanitized to
/// `[A-Za-z0-9_]` with `-` separators. The UUID makes concurrent uploads
/// collision-free without coordination.
fn generate_key(content_type: Option<&str>, suggested_name: &str) -> String {
    let resolved = resolve_content_type(content_type, suggested_name);
    let category = category_for(&resolved);

    let (stem, ext) = match suggested_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, ext),
        _ => (suggested_name, "bin"),
    };
    let stem = sanitize(stem, MAX_STEM_LEN, "upload");
    let ext = sanitize(&ext.to_ascii_lowercase(), 8, "bin");

    format!("{category}/{stem}-{}.{ext}", Uuid::new_v4())
}

/// Keep `[A-Za-z0-9_]`, map runs of anything else to a single `-`, trim to
/// `max_len`, and fall back to `default` when nothing survives.
fn sanitize(input: &str, max_len: usize, default: &str) -> String {
    let mut out = String::with_capacity(input.len().min(max_len));
    let mut last_was_dash = true;
    for c in input.chars() {
        if out.len() >= max_len {
            break;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    let out = out.trim_matches('-').to_string();
    if out.is_empty() {
        default.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBlobStore;

    fn stored_store() -> MediaStore {
        MediaStore::new(Arc::new(InMemoryBlobStore::new()), MediaConfig::default())
    }

    fn upload(store: &MediaStore, data: &'static [u8], ct: &str, name: &str) -> String {
        match store.put(Bytes::from_static(data), Some(ct), name).unwrap() {
            UploadOutcome::Stored { key, .. } => key,
            UploadOutcome::Sandboxed => panic!("expected a stored outcome"),
        }
    }

    // -----------------------------------------------------------------------
    // Upload policy
    // -----------------------------------------------------------------------

    #[test]
    fn empty_upload_is_rejected() {
        let store = stored_store();
        let err = store.put(Bytes::new(), Some("image/png"), "x.png").unwrap_err();
        assert!(matches!(err, MediaError::EmptyUpload));
    }

    #[test]
    fn oversized_upload_is_rejected_before_write() {
        let backend = Arc::new(InMemoryBlobStore::new());
        let store = MediaStore::new(
            Arc::clone(&backend) as Arc<dyn BlobStore>,
            MediaConfig { max_upload_bytes: 4 },
        );
        let err = store
            .put(Bytes::from_static(b"12345"), None, "big.bin")
            .unwrap_err();
        assert!(matches!(err, MediaError::PayloadTooLarge { size: 5, max: 4 }));
        assert!(backend.is_empty());
    }

    #[test]
    fn stored_outcome_returns_retrievable_url() {
        let store = stored_store();
        match store
            .put(Bytes::from_static(b"pixels"), Some("image/png"), "pic.png")
            .unwrap()
        {
            UploadOutcome::Stored { key, url } => {
                assert_eq!(url, format!("/api/media/{key}"));
                assert!(key.starts_with("image/"));
                let read = store.get(&key, None).unwrap();
                assert_eq!(&read.body[..], b"pixels");
            }
            UploadOutcome::Sandboxed => panic!("expected a stored outcome"),
        }
    }

    // -----------------------------------------------------------------------
    // Sandboxed mode
    // -----------------------------------------------------------------------

    #[test]
    fn sandboxed_put_soft_succeeds() {
        let store = MediaStore::sandboxed(MediaConfig::default());
        let outcome = store
            .put(Bytes::from_static(b"pixels"), Some("image/png"), "pic.png")
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Sandboxed);
    }

    #[test]
    fn sandboxed_put_still_enforces_size_policy() {
        let store = MediaStore::sandboxed(MediaConfig { max_upload_bytes: 1 });
        assert!(matches!(
            store.put(Bytes::from_static(b"xy"), None, "a.bin"),
            Err(MediaError::PayloadTooLarge { .. })
        ));
        assert!(matches!(
            store.put(Bytes::new(), None, "a.bin"),
            Err(MediaError::EmptyUpload)
        ));
    }

    #[test]
    fn sandboxed_get_fails_loudly() {
        let store = MediaStore::sandboxed(MediaConfig::default());
        let err = store.get("image/anything.png", None).unwrap_err();
        assert!(matches!(err, MediaError::BackendUnconfigured));
    }

    #[test]
    fn sandboxed_delete_is_a_noop() {
        let store = MediaStore::sandboxed(MediaConfig::default());
        assert!(!store.delete("image/anything.png").unwrap());
    }

    // -----------------------------------------------------------------------
    // Key generation
    // -----------------------------------------------------------------------

    #[test]
    fn keys_are_namespaced_by_category() {
        let store = stored_store();
        assert!(upload(&store, b"x", "image/png", "a.png").starts_with("image/"));
        assert!(upload(&store, b"x", "video/mp4", "a.mp4").starts_with("video/"));
        assert!(upload(&store, b"x", "audio/mpeg", "a.mp3").starts_with("audio/"));
        assert!(upload(&store, b"x", "application/pdf", "a.pdf").starts_with("media/"));
    }

    #[test]
    fn repeated_uploads_of_the_same_file_get_distinct_keys() {
        let store = stored_store();
        let k1 = upload(&store, b"same", "image/png", "pic.png");
        let k2 = upload(&store, b"same", "image/png", "pic.png");
        assert_ne!(k1, k2);
    }

    #[test]
    fn hostile_filenames_are_sanitized() {
        let key = generate_key(Some("image/png"), "../../etc/pass wd!!.png");
        let name = key.strip_prefix("image/").unwrap();
        assert!(name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-')));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn nameless_uploads_get_a_fallback_stem_and_extension() {
        let key = generate_key(None, "");
        assert!(key.starts_with("media/upload-"));
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn long_stems_are_truncated() {
        let name = format!("{}.png", "a".repeat(500));
        let key = generate_key(Some("image/png"), &name);
        let stem = key.strip_prefix("image/").unwrap();
        assert!(stem.len() < 100);
    }

    // -----------------------------------------------------------------------
    // Range-aware reads
    // -----------------------------------------------------------------------

    fn thousand_byte_store() -> (MediaStore, String) {
        let store = stored_store();
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let key = match store
            .put(Bytes::from(data), Some("video/mp4"), "clip.mp4")
            .unwrap()
        {
            UploadOutcome::Stored { key, .. } => key,
            UploadOutcome::Sandboxed => unreachable!(),
        };
        (store, key)
    }

    #[test]
    fn full_read_returns_the_whole_object() {
        let (store, key) = thousand_byte_store();
        let read = store.get(&key, None).unwrap();
        assert_eq!(read.status, ReadStatus::Full);
        assert_eq!(read.content_length(), 1000);
        assert_eq!(read.total_size, 1000);
        assert!(!read.is_partial());
    }

    #[test]
    fn explicit_range_returns_exactly_the_requested_bytes() {
        let (store, key) = thousand_byte_store();
        let read = store.get(&key, Some("bytes=500-699")).unwrap();
        assert_eq!(read.content_length(), 200);
        assert_eq!(
            read.status,
            ReadStatus::Partial {
                content_range: "bytes 500-699/1000".into()
            }
        );
        // The slice really is bytes 500..700 of the object.
        let full = store.get(&key, None).unwrap();
        assert_eq!(&read.body[..], &full.body[500..700]);
    }

    #[test]
    fn suffix_range_returns_the_tail() {
        let (store, key) = thousand_byte_store();
        let read = store.get(&key, Some("bytes=-100")).unwrap();
        assert_eq!(read.content_length(), 100);
        assert_eq!(
            read.status,
            ReadStatus::Partial {
                content_range: "bytes 900-999/1000".into()
            }
        );
    }

    #[test]
    fn out_of_bounds_range_is_unsatisfiable() {
        let (store, key) = thousand_byte_store();
        let err = store.get(&key, Some("bytes=2000-")).unwrap_err();
        assert!(matches!(err, MediaError::RangeNotSatisfiable { size: 1000 }));
    }

    #[test]
    fn malformed_range_falls_back_to_full_read() {
        let (store, key) = thousand_byte_store();
        let read = store.get(&key, Some("chunks=1-2")).unwrap();
        assert_eq!(read.status, ReadStatus::Full);
        assert_eq!(read.content_length(), 1000);
    }

    #[test]
    fn etag_is_stable_across_full_and_partial_reads() {
        let (store, key) = thousand_byte_store();
        let full = store.get(&key, None).unwrap();
        let partial = store.get(&key, Some("bytes=0-9")).unwrap();
        assert_eq!(full.etag, partial.etag);
    }

    // -----------------------------------------------------------------------
    // Content-type resolution on read
    // -----------------------------------------------------------------------

    #[test]
    fn read_falls_back_to_extension_when_type_unrecorded() {
        let backend = Arc::new(InMemoryBlobStore::new());
        backend
            .put("audio/track.mp3", &Blob::new(Bytes::from_static(b"waves"), None))
            .unwrap();
        let store = MediaStore::new(backend, MediaConfig::default());
        let read = store.get("audio/track.mp3", None).unwrap();
        assert_eq!(read.content_type, "audio/mpeg");
    }

    // -----------------------------------------------------------------------
    // Missing keys / delete
    // -----------------------------------------------------------------------

    #[test]
    fn get_unknown_key_is_not_found() {
        let store = stored_store();
        let err = store.get("image/ghost.png", None).unwrap_err();
        assert!(matches!(err, MediaError::NotFound(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = stored_store();
        let key = upload(&store, b"x", "image/png", "a.png");
        assert!(store.delete(&key).unwrap());
        assert!(!store.delete(&key).unwrap());
    }
}
