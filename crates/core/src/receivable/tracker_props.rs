//! Property-based tests for the receivable tracker.
//!
//! **Property: Reversal inverse law**
//! Applying then reversing any transaction restores the balance exactly.
//!
//! **Property: Cache equals the balance engine**
//! For posted transactions, the recomputed balance equals the receivable
//! account's balance restricted to the student's transactions.

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, StudentId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::student::Student;
use super::tracker::{Direction, ReceivableTracker};
use crate::balance::{BalanceEngine, DateRange};
use crate::ledger::{Transaction, TransactionStatus, TransactionType};

const ACCOUNTS: [&str; 4] = ["1-01-001", "1-01-004", "4-01-001", "5-01-001"];

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (0usize..4, 0usize..4, 1i64..1_000_000, any::<bool>()).prop_map(|(d, c, cents, posted)| {
        let mut txn = Transaction::new(
            TransactionType::Jv,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            ACCOUNTS[d],
            ACCOUNTS[c],
            Decimal::new(cents, 2),
        )
        .with_student("KMU-24-001");
        txn.status = if posted {
            TransactionStatus::Posted
        } else {
            TransactionStatus::Pending
        };
        txn
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_reversal_inverse(
        txn in transaction_strategy(),
        opening in -1_000_000i64..1_000_000,
    ) {
        let tracker = ReceivableTracker::new(AccountCode::new("1-01-004"));
        let mut student = Student::new("KMU-24-001", "Ali Khan");
        student.balance = Decimal::new(opening, 2);
        let before = student.balance;

        tracker.apply_effect(&mut student, &txn, Direction::Apply);
        tracker.apply_effect(&mut student, &txn, Direction::Reverse);

        prop_assert_eq!(student.balance, before);
    }

    #[test]
    fn prop_recompute_matches_engine(
        txns in prop::collection::vec(transaction_strategy(), 0..25),
    ) {
        let receivable = AccountCode::new("1-01-004");
        let tracker = ReceivableTracker::new(receivable.clone());
        let student_id = StudentId::new("KMU-24-001");

        let mut student = Student::new("KMU-24-001", "Ali Khan");
        for txn in txns.iter().filter(|txn| txn.is_effective()) {
            tracker.apply_effect(&mut student, txn, Direction::Apply);
        }

        let oracle = tracker.recompute(&txns, &student_id);
        let engine = BalanceEngine::account_balance(&txns, &receivable, &DateRange::unbounded(), true);
        prop_assert_eq!(student.balance, oracle);
        prop_assert_eq!(oracle, engine);
    }
}
