//! Workflow error types for transaction lifecycle management.

use thiserror::Error;

use crate::ledger::{LedgerError, TransactionStatus};

/// Errors that can occur during workflow operations.
///
/// Every variant leaves the ledger and the receivable cache untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },

    /// Deletion confirmed for a transaction that was never requested for deletion.
    #[error("Transaction in status {0} has no pending deletion")]
    NoPendingDeletion(TransactionStatus),

    /// A transaction cannot start life in this status.
    #[error("Transactions cannot be created as {0}")]
    InvalidInitialStatus(TransactionStatus),

    /// Transaction in this status cannot be edited.
    #[error("Cannot edit a transaction in status {0}")]
    NotEditable(TransactionStatus),

    /// The actor lacks the capability for the operation.
    #[error("User {user} is not authorized to {operation}")]
    NotAuthorized {
        /// The user who attempted the operation.
        user: String,
        /// The operation attempted.
        operation: &'static str,
    },

    /// Underlying ledger validation or lookup failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl WorkflowError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NoPendingDeletion(_) => "NO_PENDING_DELETION",
            Self::InvalidInitialStatus(_) => "INVALID_INITIAL_STATUS",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::Ledger(inner) => inner.error_code(),
        }
    }
}

impl From<WorkflowError> for gims_shared::AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Ledger(inner) => inner.into(),
            WorkflowError::NotAuthorized { .. } => Self::Forbidden(err.to_string()),
            WorkflowError::InvalidTransition { .. }
            | WorkflowError::NoPendingDeletion(_)
            | WorkflowError::NotEditable(_) => Self::Conflict(err.to_string()),
            WorkflowError::InvalidInitialStatus(_) => Self::Validation(err.to_string()),
        }
    }
}
