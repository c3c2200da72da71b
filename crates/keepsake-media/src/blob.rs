//! The stored blob type and content-type resolution.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Fallback type for content nothing else matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// An immutable binary object with its upload-time metadata.
///
/// The ETag is the BLAKE3 hash of the data, computed at construction. Keys
/// are never reused for different content, so the tag doubles as a
/// long-lived cache validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub etag: String,
}

impl Blob {
    /// Create a blob, computing its content-hash ETag.
    pub fn new(data: Bytes, content_type: Option<String>) -> Self {
        let etag = blake3::hash(&data).to_hex().to_string();
        Self {
            data,
            content_type,
            etag,
        }
    }

    /// Reassemble a blob from previously persisted parts.
    pub fn from_parts(data: Bytes, content_type: Option<String>, etag: String) -> Self {
        Self {
            data,
            content_type,
            etag,
        }
    }

    /// Object size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Metadata persisted next to a blob's data by file-backed stores.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlobMeta {
    pub content_type: Option<String>,
    pub etag: String,
}

/// Pick the content type to serve: the recorded upload-time type wins, then
/// extension inference from the key, then a generic binary type.
pub fn resolve_content_type(recorded: Option<&str>, key: &str) -> String {
    if let Some(recorded) = recorded {
        if !recorded.trim().is_empty() {
            return recorded.to_string();
        }
    }
    infer_from_extension(key)
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Infer a content type from a key's file extension. Covers the small fixed
/// set of formats the journal actually uploads.
fn infer_from_extension(key: &str) -> Option<&'static str> {
    let ext = key.rsplit('.').next()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        _ => return None,
    })
}

/// Coarse key namespace for a content type.
pub fn category_for(content_type: &str) -> &'static str {
    match content_type.split('/').next() {
        Some("image") => "image",
        Some("video") => "video",
        Some("audio") => "audio",
        _ => "media",
    }
}
