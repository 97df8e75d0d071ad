use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by content reading and parsing.
///
/// Validation problems are not represented here: they are reported as messages inside
/// [`crate::types::ValidationResult`]. This enum only covers the "file unreadable" side.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error while reading the content source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured-object (JSON) content is malformed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Quote-aware tabular parsing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The content read was cancelled before it completed.
    #[error("read cancelled")]
    Cancelled,

    /// A validation policy document could not be loaded.
    #[error("invalid policy: {message}")]
    InvalidPolicy { message: String },
}

impl IngestionError {
    /// `true` for failures that happened while reading the source rather than parsing it.
    pub fn is_read_failure(&self) -> bool {
        match self {
            IngestionError::Io(_) => true,
            IngestionError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}
