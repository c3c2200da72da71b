use std::sync::Arc;

use keepsake_archive::Archive;
use keepsake_media::MediaStore;

/// Shared handler state: one archive partition and one media store.
#[derive(Clone)]
pub struct AppState {
    pub archive: Arc<Archive>,
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(archive: Arc<Archive>, media: Arc<MediaStore>) -> Self {
        Self { archive, media }
    }
}
