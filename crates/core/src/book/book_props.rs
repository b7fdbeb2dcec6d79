//! Property-based tests for the finance book.
//!
//! **Property: Tracker consistency**
//! After any sequence of operations, successful or refused, every cached
//! student balance equals the receivable balance replayed from that
//! student's transactions.

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, TransactionId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::FinanceBook;
use super::types::LedgerSettings;
use crate::balance::BalanceEngine;
use crate::ledger::{DateRange, Transaction, TransactionEdit, TransactionType};
use crate::receivable::Student;
use crate::workflow::{Actor, UserRole};

const STUDENTS: [&str; 3] = ["KMU-24-001", "KMU-24-002", "PNC-24-001"];

#[derive(Debug, Clone)]
enum Op {
    Record {
        student: usize,
        leg: usize,
        cents: i64,
        privileged: bool,
    },
    Approve(usize),
    Reject(usize),
    RequestDelete(usize),
    CancelDelete(usize),
    ConfirmDelete(usize),
    EditAmount(usize, i64),
    EditLeg(usize, usize),
}

/// (debit, credit) pairs: billing, payment, unrelated.
const LEGS: [(&str, &str); 3] = [
    ("1-01-004", "4-01-001"),
    ("1-01-001", "1-01-004"),
    ("5-01-001", "1-01-001"),
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..STUDENTS.len(), 0..LEGS.len(), 1i64..500_000, prop::bool::ANY)
            .prop_map(|(student, leg, cents, privileged)| Op::Record { student, leg, cents, privileged }),
        2 => (0usize..20).prop_map(Op::Approve),
        1 => (0usize..20).prop_map(Op::Reject),
        1 => (0usize..20).prop_map(Op::RequestDelete),
        1 => (0usize..20).prop_map(Op::CancelDelete),
        1 => (0usize..20).prop_map(Op::ConfirmDelete),
        1 => ((0usize..20), -1000i64..500_000).prop_map(|(i, c)| Op::EditAmount(i, c)),
        1 => ((0usize..20), 0..LEGS.len()).prop_map(|(i, l)| Op::EditLeg(i, l)),
    ]
}

fn new_book() -> FinanceBook {
    let mut book = FinanceBook::new(LedgerSettings::default());
    for id in STUDENTS {
        book.admit_student(Student::new(id, id));
    }
    book
}

fn nth(book: &FinanceBook, index: usize) -> Option<TransactionId> {
    let len = book.ledger().len();
    (len > 0).then(|| book.ledger().as_slice()[index % len].id)
}

fn run(book: &mut FinanceBook, op: &Op) {
    let admin = Actor::new("admin", UserRole::Admin);
    let cashier = Actor::new("cashier", UserRole::Cashier);
    // Refusals are part of the property; results are ignored.
    match *op {
        Op::Record { student, leg, cents, privileged } => {
            let (debit, credit) = LEGS[leg];
            let txn = Transaction::new(
                TransactionType::Jv,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                debit,
                credit,
                Decimal::new(cents, 2),
            )
            .with_student(STUDENTS[student]);
            let actor = if privileged { &admin } else { &cashier };
            let _ = book.record(txn, actor);
        }
        Op::Approve(i) => {
            if let Some(id) = nth(book, i) {
                let _ = book.approve(id, &admin);
            }
        }
        Op::Reject(i) => {
            if let Some(id) = nth(book, i) {
                let _ = book.reject(id, &admin, None);
            }
        }
        Op::RequestDelete(i) => {
            if let Some(id) = nth(book, i) {
                let _ = book.request_delete(id, &cashier);
            }
        }
        Op::CancelDelete(i) => {
            if let Some(id) = nth(book, i) {
                let _ = book.cancel_delete(id, &admin);
            }
        }
        Op::ConfirmDelete(i) => {
            if let Some(id) = nth(book, i) {
                let _ = book.confirm_delete(id, &admin);
            }
        }
        Op::EditAmount(i, cents) => {
            if let Some(id) = nth(book, i) {
                let changes = TransactionEdit {
                    amount: Some(Decimal::new(cents, 2)),
                    ..TransactionEdit::default()
                };
                let _ = book.edit(id, &changes, &admin);
            }
        }
        Op::EditLeg(i, leg) => {
            if let Some(id) = nth(book, i) {
                let (debit, credit) = LEGS[leg];
                let changes = TransactionEdit {
                    debit_account: Some(AccountCode::new(debit)),
                    credit_account: Some(AccountCode::new(credit)),
                    ..TransactionEdit::default()
                };
                let _ = book.edit(id, &changes, &admin);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ==================== Property: Tracker consistency ====================

    #[test]
    fn prop_cache_matches_replay_after_every_step(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut book = new_book();
        let receivable = book.settings().receivable_code.clone();

        for op in &ops {
            run(&mut book, op);

            prop_assert!(book.reconcile().is_empty(), "drift after {:?}", op);
            for student in book.students().iter() {
                let own = book
                    .ledger()
                    .iter()
                    .filter(|t| t.student_id.as_ref() == Some(&student.admission_no));
                let replayed = BalanceEngine::account_balance(own, &receivable, &DateRange::unbounded(), true);
                prop_assert_eq!(student.balance, replayed);
            }
        }
    }
}
