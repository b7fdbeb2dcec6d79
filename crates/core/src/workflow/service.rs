//! Workflow service for transaction state transitions.
//!
//! This module implements the state machine:
//!
//! ```text
//! Draft -> Posted | Pending                (submit, by actor capability)
//! Pending | Rejected -> Posted             (approve)
//! Pending -> Rejected                      (reject)
//! Posted | Pending -> DeletePending        (request delete)
//! DeletePending -> previous status         (cancel delete)
//! DeletePending -> removed                 (confirm delete)
//! Draft | Pending | Posted -> same status  (edit)
//! ```
//!
//! Every function is pure: it validates and describes a transition. The
//! book applies it to the ledger and the receivable cache.

use chrono::Utc;

use crate::ledger::TransactionStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::roles::Capability;
use crate::workflow::types::WorkflowAction;

/// Stateless service for managing transaction workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Validate the status a new transaction is created in.
    ///
    /// # Arguments
    /// * `requested` - Explicit initial status chosen by the caller
    /// * `actor` - The user recording the transaction
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Create)` for `Draft`, `Pending`, or `Posted`
    /// * `Err(WorkflowError::InvalidInitialStatus)` for any other status
    /// * `Err(WorkflowError::NotAuthorized)` if `Posted` is requested by an
    ///   actor who cannot post directly
    pub fn create(
        requested: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        if !requested.is_initial() {
            return Err(WorkflowError::InvalidInitialStatus(requested));
        }
        if requested == TransactionStatus::Posted && !actor.can_post_directly() {
            return Err(Self::not_authorized(actor, "post directly"));
        }
        Ok(WorkflowAction::Create {
            new_status: requested,
            created_by: actor.actor_name().to_string(),
            created_at: Utc::now(),
        })
    }

    /// Submit a draft. The submitter's capability decides the new status.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Submit)` if the transition is valid
    /// * `Err(WorkflowError::InvalidTransition)` if not in Draft status
    pub fn submit(
        current_status: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        let new_status = actor.initial_status();
        match current_status {
            TransactionStatus::Draft => Ok(WorkflowAction::Submit {
                new_status,
                submitted_by: actor.actor_name().to_string(),
                submitted_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: new_status,
            }),
        }
    }

    /// Approve a pending transaction, or restore a rejected one.
    ///
    /// Approving an already posted transaction is refused so the balance
    /// effect can never be applied twice.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Approve)` if the transition is valid
    /// * `Err(WorkflowError::NotAuthorized)` if the actor cannot approve
    /// * `Err(WorkflowError::InvalidTransition)` if not Pending or Rejected
    pub fn approve(
        current_status: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::require_approver(actor, "approve transactions")?;
        match current_status {
            TransactionStatus::Pending | TransactionStatus::Rejected => Ok(WorkflowAction::Approve {
                new_status: TransactionStatus::Posted,
                previous_status: current_status,
                approved_by: actor.actor_name().to_string(),
                approved_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Posted,
            }),
        }
    }

    /// Reject a pending transaction.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Reject)` if the transition is valid
    /// * `Err(WorkflowError::NotAuthorized)` if the actor cannot approve
    /// * `Err(WorkflowError::InvalidTransition)` if not in Pending status
    pub fn reject(
        current_status: TransactionStatus,
        actor: &impl Capability,
        rejection_reason: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::require_approver(actor, "reject transactions")?;
        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Reject {
                new_status: TransactionStatus::Rejected,
                rejected_by: actor.actor_name().to_string(),
                rejection_reason: rejection_reason.filter(|reason| !reason.trim().is_empty()),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Rejected,
            }),
        }
    }

    /// Ask for a posted or pending transaction to be deleted.
    ///
    /// No balance effect: a posted transaction keeps counting until the
    /// deletion is confirmed.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::RequestDelete)` if the transition is valid
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn request_delete(
        current_status: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            TransactionStatus::Posted | TransactionStatus::Pending => Ok(WorkflowAction::RequestDelete {
                new_status: TransactionStatus::DeletePending,
                status_before_delete: current_status,
                requested_by: actor.actor_name().to_string(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::DeletePending,
            }),
        }
    }

    /// Withdraw a deletion request, restoring the earlier status.
    ///
    /// A record with no remembered status goes back to `Pending`, which has
    /// no balance effect.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::CancelDelete)` if the transition is valid
    /// * `Err(WorkflowError::NotAuthorized)` if the actor cannot approve
    /// * `Err(WorkflowError::NoPendingDeletion)` if not in DeletePending status
    pub fn cancel_delete(
        current_status: TransactionStatus,
        status_before_delete: Option<TransactionStatus>,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::require_approver(actor, "cancel deletion requests")?;
        match current_status {
            TransactionStatus::DeletePending => Ok(WorkflowAction::CancelDelete {
                new_status: status_before_delete.unwrap_or(TransactionStatus::Pending),
                cancelled_by: actor.actor_name().to_string(),
            }),
            _ => Err(WorkflowError::NoPendingDeletion(current_status)),
        }
    }

    /// Confirm a deletion request.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::ConfirmDelete)` with `reverse` set when the
    ///   transaction was posted at the time of the request
    /// * `Err(WorkflowError::NotAuthorized)` if the actor cannot approve
    /// * `Err(WorkflowError::NoPendingDeletion)` if not in DeletePending status
    pub fn confirm_delete(
        current_status: TransactionStatus,
        status_before_delete: Option<TransactionStatus>,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::require_approver(actor, "confirm deletions")?;
        match current_status {
            TransactionStatus::DeletePending => Ok(WorkflowAction::ConfirmDelete {
                reverse: status_before_delete == Some(TransactionStatus::Posted),
                deleted_by: actor.actor_name().to_string(),
                deleted_at: Utc::now(),
            }),
            _ => Err(WorkflowError::NoPendingDeletion(current_status)),
        }
    }

    /// Edit a transaction's fields.
    ///
    /// Drafts and pending transactions may be edited by anyone. Editing a
    /// posted transaction is a correction that requires approval rights and
    /// swaps the old balance effect for the new one.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Edit)` if the edit is allowed
    /// * `Err(WorkflowError::NotAuthorized)` for a posted edit by a restricted actor
    /// * `Err(WorkflowError::NotEditable)` for Rejected or DeletePending
    pub fn edit(
        current_status: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<WorkflowAction, WorkflowError> {
        let replace = match current_status {
            TransactionStatus::Draft | TransactionStatus::Pending => false,
            TransactionStatus::Posted => {
                Self::require_approver(actor, "edit posted transactions")?;
                true
            }
            TransactionStatus::Rejected | TransactionStatus::DeletePending => {
                return Err(WorkflowError::NotEditable(current_status));
            }
        };
        Ok(WorkflowAction::Edit {
            new_status: current_status,
            replace,
            edited_by: actor.actor_name().to_string(),
        })
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        use TransactionStatus::{DeletePending, Draft, Pending, Posted, Rejected};
        matches!(
            (from, to),
            (Draft, Posted | Pending | Draft)
                | (Pending, Posted | Rejected | DeletePending | Pending)
                | (Rejected, Posted)
                | (Posted, DeletePending | Posted)
                | (DeletePending, Posted | Pending)
        )
    }

    fn require_approver(actor: &impl Capability, operation: &'static str) -> Result<(), WorkflowError> {
        if actor.can_approve() {
            Ok(())
        } else {
            Err(Self::not_authorized(actor, operation))
        }
    }

    fn not_authorized(actor: &impl Capability, operation: &'static str) -> WorkflowError {
        WorkflowError::NotAuthorized {
            user: actor.actor_name().to_string(),
            operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::roles::{Actor, UserRole};
    use crate::workflow::types::BalanceEffect;

    fn admin() -> Actor {
        Actor::new("admin", UserRole::Admin)
    }

    fn cashier() -> Actor {
        Actor::new("cashier", UserRole::Cashier)
    }

    #[test]
    fn test_create_respects_capability() {
        assert!(WorkflowService::create(TransactionStatus::Posted, &admin()).is_ok());
        assert_eq!(
            WorkflowService::create(TransactionStatus::Posted, &cashier()),
            Err(WorkflowError::NotAuthorized {
                user: "cashier".into(),
                operation: "post directly",
            })
        );
        assert!(WorkflowService::create(TransactionStatus::Pending, &cashier()).is_ok());
        assert_eq!(
            WorkflowService::create(TransactionStatus::Rejected, &admin()),
            Err(WorkflowError::InvalidInitialStatus(TransactionStatus::Rejected))
        );
    }

    #[test]
    fn test_submit_uses_actor_initial_status() {
        let by_admin = WorkflowService::submit(TransactionStatus::Draft, &admin()).unwrap();
        assert_eq!(by_admin.new_status(), Some(TransactionStatus::Posted));
        assert_eq!(by_admin.balance_effect(), BalanceEffect::Apply);

        let by_cashier = WorkflowService::submit(TransactionStatus::Draft, &cashier()).unwrap();
        assert_eq!(by_cashier.new_status(), Some(TransactionStatus::Pending));
        assert_eq!(by_cashier.balance_effect(), BalanceEffect::None);

        assert!(WorkflowService::submit(TransactionStatus::Pending, &admin()).is_err());
    }

    #[test]
    fn test_approve_pending_and_rejected() {
        for status in [TransactionStatus::Pending, TransactionStatus::Rejected] {
            let action = WorkflowService::approve(status, &admin()).unwrap();
            assert_eq!(action.new_status(), Some(TransactionStatus::Posted));
            assert_eq!(action.balance_effect(), BalanceEffect::Apply);
        }
    }

    #[test]
    fn test_approve_posted_is_refused() {
        assert_eq!(
            WorkflowService::approve(TransactionStatus::Posted, &admin()),
            Err(WorkflowError::InvalidTransition {
                from: TransactionStatus::Posted,
                to: TransactionStatus::Posted,
            })
        );
    }

    #[test]
    fn test_restricted_actor_cannot_approve() {
        let err = WorkflowService::approve(TransactionStatus::Pending, &cashier()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_AUTHORIZED");
    }

    #[test]
    fn test_reject_only_pending() {
        let action = WorkflowService::reject(TransactionStatus::Pending, &admin(), Some("  ".into())).unwrap();
        assert_eq!(
            action,
            WorkflowAction::Reject {
                new_status: TransactionStatus::Rejected,
                rejected_by: "admin".into(),
                rejection_reason: None,
            }
        );
        assert!(WorkflowService::reject(TransactionStatus::Posted, &admin(), None).is_err());
        assert!(WorkflowService::reject(TransactionStatus::Rejected, &admin(), None).is_err());
    }

    #[test]
    fn test_delete_flow() {
        let request = WorkflowService::request_delete(TransactionStatus::Posted, &cashier()).unwrap();
        assert_eq!(request.balance_effect(), BalanceEffect::None);
        assert!(WorkflowService::request_delete(TransactionStatus::Draft, &cashier()).is_err());

        let cancel = WorkflowService::cancel_delete(
            TransactionStatus::DeletePending,
            Some(TransactionStatus::Posted),
            &admin(),
        )
        .unwrap();
        assert_eq!(cancel.new_status(), Some(TransactionStatus::Posted));

        let confirm_posted = WorkflowService::confirm_delete(
            TransactionStatus::DeletePending,
            Some(TransactionStatus::Posted),
            &admin(),
        )
        .unwrap();
        assert_eq!(confirm_posted.balance_effect(), BalanceEffect::Reverse);

        let confirm_pending = WorkflowService::confirm_delete(
            TransactionStatus::DeletePending,
            Some(TransactionStatus::Pending),
            &admin(),
        )
        .unwrap();
        assert_eq!(confirm_pending.balance_effect(), BalanceEffect::None);

        assert_eq!(
            WorkflowService::confirm_delete(TransactionStatus::Posted, None, &admin()),
            Err(WorkflowError::NoPendingDeletion(TransactionStatus::Posted))
        );
    }

    #[test]
    fn test_edit_rules() {
        assert_eq!(
            WorkflowService::edit(TransactionStatus::Pending, &cashier())
                .unwrap()
                .balance_effect(),
            BalanceEffect::None
        );
        assert_eq!(
            WorkflowService::edit(TransactionStatus::Posted, &admin())
                .unwrap()
                .balance_effect(),
            BalanceEffect::Replace
        );
        assert!(WorkflowService::edit(TransactionStatus::Posted, &cashier()).is_err());
        assert_eq!(
            WorkflowService::edit(TransactionStatus::Rejected, &admin()),
            Err(WorkflowError::NotEditable(TransactionStatus::Rejected))
        );
    }

    #[test]
    fn test_valid_transitions() {
        assert!(WorkflowService::is_valid_transition(
            TransactionStatus::Rejected,
            TransactionStatus::Posted
        ));
        assert!(!WorkflowService::is_valid_transition(
            TransactionStatus::Posted,
            TransactionStatus::Pending
        ));
        assert!(!WorkflowService::is_valid_transition(
            TransactionStatus::Rejected,
            TransactionStatus::Pending
        ));
    }
}
