use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use keepsake_archive::ArchiveError;
use keepsake_media::MediaError;
use keepsake_types::ApiResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("{0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Archive(ArchiveError::Validation(_)) => StatusCode::BAD_REQUEST,
            ServerError::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Media(MediaError::EmptyUpload) => StatusCode::BAD_REQUEST,
            ServerError::Media(MediaError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ServerError::Media(MediaError::PayloadTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ServerError::Media(MediaError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Media(MediaError::RangeNotSatisfiable { .. }) => {
                StatusCode::RANGE_NOT_SATISFIABLE
            }
            ServerError::Media(MediaError::BackendUnconfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Io(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%self, "request failed");
        }
        let body = Json(ApiResponse::<()>::err(self.to_string()));
        // 416 responses carry the object size so clients can re-request.
        if let ServerError::Media(MediaError::RangeNotSatisfiable { size }) = &self {
            let content_range = format!("bytes */{size}");
            return (status, [(header::CONTENT_RANGE, content_range)], body).into_response();
        }
        (status, body).into_response()
    }
}
