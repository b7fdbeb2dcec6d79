//! Property-based tests for WorkflowService.

use proptest::prelude::*;

use crate::ledger::TransactionStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::roles::{Actor, Capability, UserRole};
use crate::workflow::service::WorkflowService;
use crate::workflow::types::BalanceEffect;

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Draft),
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Posted),
        Just(TransactionStatus::Rejected),
        Just(TransactionStatus::DeletePending),
    ]
}

fn arb_actor() -> impl Strategy<Value = Actor> {
    (
        "[a-z]{3,10}",
        prop_oneof![
            Just(UserRole::Cashier),
            Just(UserRole::Accountant),
            Just(UserRole::FinanceManager),
            Just(UserRole::Admin),
        ],
    )
        .prop_map(|(name, role)| Actor::new(name, role))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property 1: Every accepted transition is in the transition table
    // =========================================================================

    #[test]
    fn prop_accepted_transitions_are_valid(status in arb_status(), before in arb_status(), actor in arb_actor()) {
        let attempts = [
            WorkflowService::submit(status, &actor),
            WorkflowService::approve(status, &actor),
            WorkflowService::reject(status, &actor, None),
            WorkflowService::request_delete(status, &actor),
            WorkflowService::cancel_delete(status, Some(before), &actor),
            WorkflowService::edit(status, &actor),
        ];
        for action in attempts.into_iter().flatten() {
            if let Some(next) = action.new_status() {
                prop_assert!(
                    WorkflowService::is_valid_transition(status, next)
                        || (status == TransactionStatus::DeletePending && next == before),
                    "{:?} -> {:?} accepted but not in table", status, next
                );
            }
            prop_assert_eq!(action.performed_by(), actor.actor_name());
        }
    }

    // =========================================================================
    // Property 2: Idempotent approval
    // Approving something already posted is always refused.
    // =========================================================================

    #[test]
    fn prop_approve_posted_never_applies(actor in arb_actor()) {
        let result = WorkflowService::approve(TransactionStatus::Posted, &actor);
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_approve_then_approve_refused(status in arb_status()) {
        let actor = Actor::new("fm", UserRole::FinanceManager);
        if let Ok(first) = WorkflowService::approve(status, &actor) {
            let next = first.new_status().unwrap();
            let is_invalid_transition = matches!(
                WorkflowService::approve(next, &actor),
                Err(WorkflowError::InvalidTransition { .. })
            );
            prop_assert!(is_invalid_transition);
        }
    }

    // =========================================================================
    // Property 3: Balance effect follows effective posted-ness
    // Apply only when the transaction starts counting, Reverse only when a
    // counting transaction is removed.
    // =========================================================================

    #[test]
    fn prop_effects_track_posted_ness(status in arb_status(), before in arb_status(), actor in arb_actor()) {
        let counting_before = status == TransactionStatus::Posted
            || (status == TransactionStatus::DeletePending && before == TransactionStatus::Posted);

        let actions = [
            WorkflowService::submit(status, &actor),
            WorkflowService::approve(status, &actor),
            WorkflowService::reject(status, &actor, None),
            WorkflowService::request_delete(status, &actor),
            WorkflowService::cancel_delete(status, Some(before), &actor),
            WorkflowService::confirm_delete(status, Some(before), &actor),
        ];
        for action in actions.into_iter().flatten() {
            let counting_after = match action.new_status() {
                None => false,
                Some(TransactionStatus::DeletePending) => counting_before,
                Some(next) => next == TransactionStatus::Posted,
            };
            let expected = match (counting_before, counting_after) {
                (false, true) => BalanceEffect::Apply,
                (true, false) => BalanceEffect::Reverse,
                _ => BalanceEffect::None,
            };
            prop_assert_eq!(action.balance_effect(), expected, "{:?}", action);
        }
    }

    // =========================================================================
    // Property 4: Restricted actors never approve, reject or confirm
    // =========================================================================

    #[test]
    fn prop_restricted_actors_denied(status in arb_status(), name in "[a-z]{3,8}") {
        let actor = Actor::new(name, UserRole::Cashier);
        let denied = [
            WorkflowService::approve(status, &actor),
            WorkflowService::reject(status, &actor, None),
            WorkflowService::confirm_delete(status, None, &actor),
        ];
        for result in denied {
            let is_not_authorized = matches!(result, Err(WorkflowError::NotAuthorized { .. }));
            prop_assert!(is_not_authorized);
        }
    }
}
