//! HTTP byte-range parsing and arithmetic.
//!
//! Implements the subset of RFC 7233 the media endpoint needs: a single
//! `bytes=<start>-<end>` range, the open form `bytes=<start>-`, and the
//! suffix form `bytes=-<N>` (last N bytes). Malformed headers are ignored
//! (the caller serves the full object, as the RFC allows); syntactically
//! valid but out-of-bounds ranges are unsatisfiable.

use crate::error::MediaError;

/// An inclusive byte range, validated against an object size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Parse a `Range` header value against an object of `size` bytes.
    ///
    /// Returns:
    /// - `Ok(Some(range))` for a satisfiable single bytes range,
    /// - `Ok(None)` when the header is malformed or not a bytes range
    ///   (the caller should fall back to a full response),
    /// - `Err(RangeNotSatisfiable)` when the range is well-formed but
    ///   cannot be satisfied (start at or past the end of the object).
    pub fn parse(header: &str, size: u64) -> Result<Option<ByteRange>, MediaError> {
        let Some(spec) = header.trim().strip_prefix("bytes=") else {
            return Ok(None);
        };
        // Multi-range requests are not supported; serve the full object.
        if spec.contains(',') {
            return Ok(None);
        }
        let Some((start_str, end_str)) = spec.split_once('-') else {
            return Ok(None);
        };
        let start_str = start_str.trim();
        let end_str = end_str.trim();

        let unsatisfiable = Err(MediaError::RangeNotSatisfiable { size });

        if start_str.is_empty() {
            // Suffix form: last N bytes.
            let Ok(suffix_len) = end_str.parse::<u64>() else {
                return Ok(None);
            };
            if suffix_len == 0 || size == 0 {
                return unsatisfiable;
            }
            return Ok(Some(ByteRange {
                start: size.saturating_sub(suffix_len),
                end: size - 1,
            }));
        }

        let Ok(start) = start_str.parse::<u64>() else {
            return Ok(None);
        };
        let end = if end_str.is_empty() {
            None
        } else {
            match end_str.parse::<u64>() {
                Ok(end) => Some(end),
                Err(_) => return Ok(None),
            }
        };
        // A last-byte-pos before the first-byte-pos is a malformed spec.
        if matches!(end, Some(end) if end < start) {
            return Ok(None);
        }
        if start >= size {
            return unsatisfiable;
        }
        // Clamp an absent or oversized end to the last byte.
        let end = end.map_or(size - 1, |end| end.min(size - 1));
        Ok(Some(ByteRange { start, end }))
    }

    /// Number of bytes the range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// The `Content-Range` header value for this range of an object of
    /// `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}
