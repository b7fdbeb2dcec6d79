//! Book-level errors.

use gims_shared::AppError;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::ledger::LedgerError;
use crate::workflow::WorkflowError;

/// Errors from operations that combine generation with the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Transition, authorization or ledger failure.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Fee batch or receipt could not be built.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl BookError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Workflow(inner) => inner.error_code(),
            Self::Generation(inner) => inner.error_code(),
        }
    }
}

impl From<LedgerError> for BookError {
    fn from(err: LedgerError) -> Self {
        Self::Workflow(err.into())
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Workflow(inner) => inner.into(),
            BookError::Generation(inner) => inner.into(),
        }
    }
}
