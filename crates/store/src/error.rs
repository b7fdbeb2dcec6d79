//! Storage error types.

use gims_core::ledger::LedgerError;
use gims_shared::AppError;
use thiserror::Error;

/// Errors from reading or writing stored blobs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error on {key}: {source}")]
    Io {
        /// Blob key involved.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A blob is not valid JSON for its collection.
    #[error("Malformed blob {key}: {source}")]
    Json {
        /// Blob key involved.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The stored collections do not form a valid book.
    #[error("Invalid stored book: {0}")]
    InvalidBook(#[from] LedgerError),
}

impl StoreError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "STORE_IO",
            Self::Json { .. } => "STORE_MALFORMED",
            Self::InvalidBook(_) => "STORE_INVALID_BOOK",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
