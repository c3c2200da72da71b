//! Journal entry types and their wire shape.

use serde::{Deserialize, Serialize};

/// Neutral swatch used when a non-text entry carries no extracted color.
pub const DEFAULT_DOMINANT_COLOR: &str = "#808080";

/// Media category of a journal entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Text,
    Image,
    Video,
    Audio,
}

impl EntryKind {
    /// Returns `true` for entries expected to reference media.
    pub fn is_media(&self) -> bool {
        !matches!(self, EntryKind::Text)
    }
}

/// One journal record.
///
/// The wire shape uses camelCase for the optional media fields, matching the
/// persisted record format. `id` is opaque and immutable once created; the
/// archive never reuses ids for different records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque unique identifier.
    pub id: String,
    /// Narrative text. Never blank after trimming; enforced by the archive.
    pub content: String,
    /// Calendar date the memory occurred (`YYYY-MM-DD` expected, malformed
    /// values tolerated by readers).
    pub date: String,
    /// Media category.
    pub kind: EntryKind,
    /// Direct URL to the hosted asset, or a path into the media store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Locally generated low-resolution fallback (e.g. a data-URL thumbnail).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Extracted dominant color used as a placeholder background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<String>,
    /// Original filename of the uploaded asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Entry {
    /// Create a text-only entry with no media fields set.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        date: impl Into<String>,
        kind: EntryKind,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            date: date.into(),
            kind,
            media_url: None,
            preview_url: None,
            dominant_color: None,
            file_name: None,
        }
    }

    /// Attach a media URL.
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    /// Returns `true` if the entry references media by URL or filename.
    pub fn has_media_reference(&self) -> bool {
        self.media_url.is_some() || self.file_name.is_some()
    }
}

/// Field-level partial update for an [`Entry`].
///
/// Absent fields leave the existing record untouched; present fields replace
/// their counterpart. `id` is deliberately not patchable.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub content: Option<String>,
    pub date: Option<String>,
    pub kind: Option<EntryKind>,
    pub media_url: Option<String>,
    pub preview_url: Option<String>,
    pub dominant_color: Option<String>,
    pub file_name: Option<String>,
}

impl EntryPatch {
    /// Shallow-merge this patch over `entry`, field by field.
    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(content) = &self.content {
            entry.content = content.clone();
        }
        if let Some(date) = &self.date {
            entry.date = date.clone();
        }
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(media_url) = &self.media_url {
            entry.media_url = Some(media_url.clone());
        }
        if let Some(preview_url) = &self.preview_url {
            entry.preview_url = Some(preview_url.clone());
        }
        if let Some(dominant_color) = &self.dominant_color {
            entry.dominant_color = Some(dominant_color.clone());
        }
        if let Some(file_name) = &self.file_name {
            entry.file_name = Some(file_name.clone());
        }
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.date.is_none()
            && self.kind.is_none()
            && self.media_url.is_none()
            && self.preview_url.is_none()
            && self.dominant_color.is_none()
            && self.file_name.is_none()
    }
}
