/// Errors from archive operations.
///
/// There is deliberately no `NotFound` variant: updating or deleting a
/// missing entry is a silent no-op, which keeps racing deletes harmless.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The entry failed validation. Client error, never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Serialization or deserialization of a stored record failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The underlying storage backend failed. Transient; the caller owns
    /// any retry decision.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        ArchiveError::Serialization(err.to_string())
    }
}

/// Result alias for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
