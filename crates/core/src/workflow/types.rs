//! Workflow domain types for transaction lifecycle management.

use chrono::{DateTime, Utc};

use super::audit::AuditAction;
use crate::ledger::TransactionStatus;

/// Receivable side effect of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// Nothing changes.
    None,
    /// The transaction starts counting.
    Apply,
    /// The transaction stops counting.
    Reverse,
    /// The old version stops counting and the new one starts, in one step.
    Replace,
}

/// Workflow action representing a validated transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// A new transaction enters the ledger.
    Create {
        /// Starting status.
        new_status: TransactionStatus,
        /// The user who recorded the transaction.
        created_by: String,
        /// When it was recorded.
        created_at: DateTime<Utc>,
    },
    /// A draft is submitted.
    Submit {
        /// `Posted` or `Pending`, depending on the submitter.
        new_status: TransactionStatus,
        /// The user who submitted the transaction.
        submitted_by: String,
        /// When it was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// A pending or rejected transaction is posted.
    Approve {
        /// Always `Posted`.
        new_status: TransactionStatus,
        /// Status before approval.
        previous_status: TransactionStatus,
        /// The user who approved the transaction.
        approved_by: String,
        /// When it was approved.
        approved_at: DateTime<Utc>,
    },
    /// A pending transaction is refused.
    Reject {
        /// Always `Rejected`.
        new_status: TransactionStatus,
        /// The user who rejected the transaction.
        rejected_by: String,
        /// Optional reason.
        rejection_reason: Option<String>,
    },
    /// Deletion is requested.
    RequestDelete {
        /// Always `DeletePending`.
        new_status: TransactionStatus,
        /// Status to restore if the request is cancelled.
        status_before_delete: TransactionStatus,
        /// The user who asked for deletion.
        requested_by: String,
    },
    /// A deletion request is withdrawn.
    CancelDelete {
        /// The status held before the request.
        new_status: TransactionStatus,
        /// The user who withdrew the request.
        cancelled_by: String,
    },
    /// Deletion is confirmed. The record leaves the ledger.
    ConfirmDelete {
        /// True if the transaction was counting and must be reversed.
        reverse: bool,
        /// The user who confirmed deletion.
        deleted_by: String,
        /// When it was deleted.
        deleted_at: DateTime<Utc>,
    },
    /// Fields are changed. The status stays the same.
    Edit {
        /// Unchanged status.
        new_status: TransactionStatus,
        /// True if the old effect must be swapped for the new one.
        replace: bool,
        /// The user who edited the transaction.
        edited_by: String,
    },
}

impl WorkflowAction {
    /// Returns the status after this action, or `None` if the record is removed.
    #[must_use]
    pub fn new_status(&self) -> Option<TransactionStatus> {
        match self {
            Self::Create { new_status, .. }
            | Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::RequestDelete { new_status, .. }
            | Self::CancelDelete { new_status, .. }
            | Self::Edit { new_status, .. } => Some(*new_status),
            Self::ConfirmDelete { .. } => None,
        }
    }

    /// Returns the receivable side effect of this action.
    #[must_use]
    pub fn balance_effect(&self) -> BalanceEffect {
        match self {
            Self::Create { new_status, .. } | Self::Submit { new_status, .. } => {
                if *new_status == TransactionStatus::Posted {
                    BalanceEffect::Apply
                } else {
                    BalanceEffect::None
                }
            }
            Self::Approve { .. } => BalanceEffect::Apply,
            Self::Reject { .. } | Self::RequestDelete { .. } | Self::CancelDelete { .. } => {
                BalanceEffect::None
            }
            Self::ConfirmDelete { reverse, .. } => {
                if *reverse {
                    BalanceEffect::Reverse
                } else {
                    BalanceEffect::None
                }
            }
            Self::Edit { replace, .. } => {
                if *replace {
                    BalanceEffect::Replace
                } else {
                    BalanceEffect::None
                }
            }
        }
    }

    /// Returns the audit trail action for this transition.
    #[must_use]
    pub fn audit_action(&self) -> AuditAction {
        match self {
            Self::Create { .. } => AuditAction::Create,
            Self::Submit { .. } => AuditAction::Submit,
            Self::Approve { .. } => AuditAction::Approve,
            Self::Reject { .. } => AuditAction::Reject,
            Self::RequestDelete { .. } => AuditAction::DeleteRequest,
            Self::CancelDelete { .. } => AuditAction::CancelDelete,
            Self::ConfirmDelete { .. } => AuditAction::Delete,
            Self::Edit { .. } => AuditAction::Edit,
        }
    }

    /// Returns the user who performed the action.
    #[must_use]
    pub fn performed_by(&self) -> &str {
        match self {
            Self::Create { created_by: user, .. }
            | Self::Submit { submitted_by: user, .. }
            | Self::Approve { approved_by: user, .. }
            | Self::Reject { rejected_by: user, .. }
            | Self::RequestDelete { requested_by: user, .. }
            | Self::CancelDelete { cancelled_by: user, .. }
            | Self::ConfirmDelete { deleted_by: user, .. }
            | Self::Edit { edited_by: user, .. } => user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_delete_removes_record() {
        let action = WorkflowAction::ConfirmDelete {
            reverse: true,
            deleted_by: "fm".into(),
            deleted_at: Utc::now(),
        };
        assert_eq!(action.new_status(), None);
        assert_eq!(action.balance_effect(), BalanceEffect::Reverse);
        assert_eq!(action.audit_action(), AuditAction::Delete);
        assert_eq!(action.performed_by(), "fm");
    }

    #[test]
    fn test_create_effect_depends_on_status() {
        let pending = WorkflowAction::Create {
            new_status: TransactionStatus::Pending,
            created_by: "cash".into(),
            created_at: Utc::now(),
        };
        assert_eq!(pending.balance_effect(), BalanceEffect::None);

        let posted = WorkflowAction::Create {
            new_status: TransactionStatus::Posted,
            created_by: "admin".into(),
            created_at: Utc::now(),
        };
        assert_eq!(posted.balance_effect(), BalanceEffect::Apply);
    }
}
