//! Ledger error types for validation, reference and lookup errors.

use gims_shared::types::{AccountCode, StudentId, TransactionId};
use thiserror::Error;

use crate::accounts::AccountError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Transaction amount cannot be negative.
    #[error("Transaction amount cannot be negative")]
    NegativeAmount,

    /// Debit and credit legs name the same account.
    #[error("Debit and credit legs must differ, both are {0}")]
    SameAccount(AccountCode),

    // ========== Reference Errors ==========
    /// A leg names an unknown or non-postable account.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The transaction names a student that does not exist.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    // ========== Store Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// A transaction with this id is already in the ledger.
    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(TransactionId),
}

impl LedgerError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SameAccount(_) => "SAME_ACCOUNT",
            Self::Account(inner) => inner.error_code(),
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",
        }
    }

    /// Returns true if the error is a bad reference to another record.
    #[must_use]
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::Account(_) | Self::StudentNotFound(_) | Self::TransactionNotFound(_)
        )
    }
}

impl From<LedgerError> for gims_shared::AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::StudentNotFound(_) | LedgerError::TransactionNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::DuplicateTransaction(_) => Self::Conflict(err.to_string()),
            LedgerError::ZeroAmount
            | LedgerError::NegativeAmount
            | LedgerError::SameAccount(_)
            | LedgerError::Account(_) => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gims_shared::AppError;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(
            LedgerError::Account(AccountError::NotPostable(AccountCode::new("1"))).error_code(),
            "ACCOUNT_NOT_POSTABLE"
        );
        assert_eq!(
            LedgerError::StudentNotFound(StudentId::new("X")).error_code(),
            "STUDENT_NOT_FOUND"
        );
    }

    #[test]
    fn test_reference_errors() {
        assert!(LedgerError::StudentNotFound(StudentId::new("X")).is_reference_error());
        assert!(!LedgerError::ZeroAmount.is_reference_error());
    }

    #[test]
    fn test_app_error_categories() {
        let missing: AppError = LedgerError::TransactionNotFound(TransactionId::new()).into();
        assert_eq!(missing.error_code(), "NOT_FOUND");
        let invalid: AppError = LedgerError::ZeroAmount.into();
        assert_eq!(invalid.error_code(), "VALIDATION_ERROR");
        assert!(invalid.is_recoverable());
    }
}
