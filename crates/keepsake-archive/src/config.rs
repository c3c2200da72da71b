use serde::{Deserialize, Serialize};

/// Configuration for an [`Archive`](crate::Archive) partition.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// When `true`, entries of a non-text kind must reference media (a
    /// `mediaUrl` or a `fileName`) to pass validation. The permissive
    /// default accepts media-less non-text entries and lets the renderer
    /// fall back to the preview signature or a placeholder.
    pub require_media_for_non_text: bool,
    /// When `true`, an empty archive is seeded with a few demonstration
    /// entries on its very first open. Seeding happens once, inside the
    /// migration step; a cleared archive stays empty.
    pub seed_demo_entries: bool,
}

impl ArchiveConfig {
    /// The strict policy: non-text entries must reference media.
    pub fn strict() -> Self {
        Self {
            require_media_for_non_text: true,
            ..Default::default()
        }
    }
}
