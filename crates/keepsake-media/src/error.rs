/// Errors from media store operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The uploaded payload was empty.
    #[error("uploaded file is empty")]
    EmptyUpload,

    /// The payload exceeds the configured size cap. Rejected before any
    /// storage write.
    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: u64, max: u64 },

    /// No object exists under the requested key.
    #[error("media not found: {0}")]
    NotFound(String),

    /// The key contains characters the store refuses to touch.
    #[error("invalid media key: {0}")]
    InvalidKey(String),

    /// The requested byte range cannot be satisfied against an object of
    /// this size.
    #[error("requested range not satisfiable for object of {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    /// No durable blob backend is configured. Reads fail with this; writes
    /// degrade to a sandboxed outcome instead.
    #[error("no media backend configured")]
    BackendUnconfigured,

    /// Metadata sidecar could not be encoded or decoded.
    #[error("metadata serialization error: {0}")]
    Serialization(String),

    /// The underlying storage backend failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        MediaError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(err: serde_json::Error) -> Self {
        MediaError::Serialization(err.to_string())
    }
}

/// Result alias for media operations.
pub type MediaResult<T> = Result<T, MediaError>;
