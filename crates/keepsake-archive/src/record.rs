//! Persisted record shapes: the current per-entry record and the legacy
//! whole-collection blob it migrated from.

use serde::{Deserialize, Serialize};

use keepsake_types::{Entry, EntryKind, DEFAULT_DOMINANT_COLOR};

/// The current persisted shape: one record per entry under `entry/{id}`.
///
/// `seq` is a monotonically increasing insertion counter used only as the
/// sort tie-break for entries sharing a date. It never crosses the HTTP
/// boundary; handlers serialize the inner [`Entry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRecord {
    pub seq: u64,
    #[serde(flatten)]
    pub entry: Entry,
}

/// A record as stored by earlier deployments inside the single `memories`
/// blob. Differences from the current shape: the kind field was named
/// `type`, `date` could be missing, and a since-removed `mood` tag could be
/// present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRecord {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub dominant_color: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Deprecated tag, dropped during migration.
    #[serde(default)]
    pub mood: Option<String>,
}

impl LegacyRecord {
    /// Convert into the current shape, backfilling the missing defaults.
    ///
    /// `today` is the fallback for records that never had a date. The
    /// `mood` tag is discarded here and nowhere else.
    pub fn into_entry(self, today: &str) -> Entry {
        let dominant_color = match (&self.dominant_color, self.kind.is_media()) {
            (None, true) => Some(DEFAULT_DOMINANT_COLOR.to_string()),
            _ => self.dominant_color,
        };
        Entry {
            id: self.id,
            content: self.content,
            date: self.date.unwrap_or_else(|| today.to_string()),
            kind: self.kind,
            media_url: self.media_url,
            preview_url: self.preview_url,
            dominant_color,
            file_name: self.file_name,
        }
    }
}
