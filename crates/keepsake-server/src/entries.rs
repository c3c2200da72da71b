//! Handlers for the journal entry CRUD endpoints.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use keepsake_types::{ApiResponse, Entry, EntryPatch};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

type EntryList = Json<ApiResponse<Vec<Entry>>>;

/// `GET /api/memories` — the full collection, chronologically sorted.
pub async fn list_entries(State(state): State<AppState>) -> ServerResult<EntryList> {
    let entries = state.archive.list()?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// `POST /api/memories` — validate and insert one entry.
///
/// The body is decoded by hand so a malformed entry (unknown kind, missing
/// field) comes back as a 400 in the standard envelope rather than a bare
/// extractor rejection.
pub async fn add_entry(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ServerResult<EntryList> {
    let entry: Entry = serde_json::from_value(body)
        .map_err(|err| ServerError::BadRequest(format!("invalid entry: {err}")))?;
    let entries = state.archive.add(entry)?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// `PUT /api/memories/{id}` — field-level merge over an existing entry.
/// A missing id is a no-op that still returns the current list.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ServerResult<EntryList> {
    let patch: EntryPatch = serde_json::from_value(body)
        .map_err(|err| ServerError::BadRequest(format!("invalid patch: {err}")))?;
    let entries = state.archive.update(&id, &patch)?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// `DELETE /api/memories/{id}` — idempotent removal.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<EntryList> {
    let entries = state.archive.delete(&id)?;
    Ok(Json(ApiResponse::ok(entries)))
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    confirm: Option<String>,
}

/// `DELETE /api/memories?confirm=true` — unconditional wipe.
///
/// The archive itself clears without ceremony; the explicit confirmation
/// lives here, at the caller boundary, so the wipe is never reachable by
/// accident.
pub async fn clear_entries(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> ServerResult<EntryList> {
    if query.confirm.as_deref() != Some("true") {
        return Err(ServerError::BadRequest(
            "clearing the archive requires confirm=true".into(),
        ));
    }
    let entries = state.archive.clear()?;
    Ok(Json(ApiResponse::ok(entries)))
}
