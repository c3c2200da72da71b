//! Handlers for media upload and range-aware media delivery.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, Response, StatusCode};
use axum::response::Json;
use serde_json::json;

use keepsake_media::{ReadStatus, UploadOutcome};
use keepsake_types::ApiResponse;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Keys are never reused for different content, so media responses can be
/// cached for a year and revalidated never.
const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// `POST /api/memories/upload` — multipart file upload.
///
/// With a durable backend the response carries `{url, key}`; in sandboxed
/// mode it carries `{status: "sandboxed"}` so the client keeps the entry
/// with only its locally generated preview.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<ApiResponse<serde_json::Value>>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::BadRequest(format!("malformed multipart body: {err}")))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| ServerError::BadRequest(format!("failed to read upload: {err}")))?;
        file = Some((file_name, content_type, data));
        break;
    }
    let Some((file_name, content_type, data)) = file else {
        return Err(ServerError::BadRequest("no file provided".into()));
    };

    let outcome = state.media.put(data, content_type.as_deref(), &file_name)?;
    let data = match outcome {
        UploadOutcome::Stored { key, url } => json!({ "url": url, "key": key }),
        UploadOutcome::Sandboxed => json!({ "status": "sandboxed" }),
    };
    Ok(Json(ApiResponse::ok(data)))
}

/// `GET /api/media/{category}/{filename}` — full or partial object read.
///
/// Honors a single `bytes` range (206 with `Content-Range`); always
/// advertises `Accept-Ranges: bytes` so players know seeking works.
pub async fn get_media(
    State(state): State<AppState>,
    Path((category, filename)): Path<(String, String)>,
    headers: HeaderMap,
) -> ServerResult<Response<Body>> {
    let key = format!("{category}/{filename}");
    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let read = state.media.get(&key, range_header)?;
    let status = if read.is_partial() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, &read.content_type)
        .header(header::CONTENT_LENGTH, read.content_length())
        .header(header::ETAG, format!("\"{}\"", read.etag))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, IMMUTABLE_CACHE);
    if let ReadStatus::Partial { content_range } = &read.status {
        response = response.header(header::CONTENT_RANGE, content_range);
    }
    response
        .body(Body::from(read.body))
        .map_err(|err| ServerError::Internal(err.to_string()))
}
