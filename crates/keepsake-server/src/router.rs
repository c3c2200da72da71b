use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{entries, handler, media};

/// Multipart framing overhead allowed on top of the raw upload cap.
const UPLOAD_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Build the axum router with all Keepsake endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.media.config().max_upload_bytes + UPLOAD_OVERHEAD_BYTES;
    Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/info", get(handler::info_handler))
        .route(
            "/api/memories",
            get(entries::list_entries)
                .post(entries::add_entry)
                .delete(entries::clear_entries),
        )
        .route(
            "/api/memories/:id",
            put(entries::update_entry).delete(entries::delete_entry),
        )
        .route("/api/memories/upload", post(media::upload_media))
        .route("/api/media/:category/:filename", get(media::get_media))
        .layer(DefaultBodyLimit::max(body_limit as usize))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
