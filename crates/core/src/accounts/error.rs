//! Chart of accounts error types.

use gims_shared::types::AccountCode;
use thiserror::Error;

/// Errors raised while building or querying the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Two accounts share a code.
    #[error("Duplicate account code: {0}")]
    DuplicateCode(AccountCode),

    /// The code's segment count does not match the declared level.
    #[error("Account {code} has {segments} segments but is declared at level {level}")]
    LevelMismatch {
        /// Offending code.
        code: AccountCode,
        /// Declared level.
        level: usize,
        /// Segment count of the code.
        segments: usize,
    },

    /// A level-1 account declares a parent, or a deeper one is missing it.
    #[error("Account {0} has an invalid parent code")]
    InvalidParent(AccountCode),

    /// The parent account is not in the chart.
    #[error("Parent {parent} of account {code} does not exist")]
    ParentNotFound {
        /// Child code.
        code: AccountCode,
        /// Missing parent code.
        parent: AccountCode,
    },

    /// The parent sits at the wrong level or category.
    #[error("Parent {parent} of account {code} is not a compatible level or category")]
    IncompatibleParent {
        /// Child code.
        code: AccountCode,
        /// Parent code.
        parent: AccountCode,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountCode),

    /// Only level-3 accounts carry transactions.
    #[error("Account {0} is a heading and does not allow posting")]
    NotPostable(AccountCode),
}

impl AccountError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::LevelMismatch { .. } => "ACCOUNT_LEVEL_MISMATCH",
            Self::InvalidParent(_) => "INVALID_PARENT",
            Self::ParentNotFound { .. } => "PARENT_NOT_FOUND",
            Self::IncompatibleParent { .. } => "INCOMPATIBLE_PARENT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NotPostable(_) => "ACCOUNT_NOT_POSTABLE",
        }
    }
}
