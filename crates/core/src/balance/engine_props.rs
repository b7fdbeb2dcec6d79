//! Property-based tests for the balance engine.
//!
//! **Property: Date filtering boundary**
//! A transaction dated exactly on either bound is included; one day outside
//! either bound is excluded.
//!
//! **Property: Balance equals debits minus credits**

use chrono::{Days, NaiveDate};
use gims_shared::types::AccountCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::BalanceEngine;
use crate::ledger::{DateRange, Transaction, TransactionStatus, TransactionType};

fn posted_on(date: NaiveDate, debit: &str, credit: &str, amount: Decimal) -> Transaction {
    let mut txn = Transaction::new(TransactionType::Jv, date, debit, credit, amount);
    txn.status = TransactionStatus::Posted;
    txn
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bounds_inclusive_neighbours_excluded(
        start_offset in 1u64..300,
        span in 0u64..60,
        cents in 1i64..1_000_000,
    ) {
        let from = base_date() + Days::new(start_offset);
        let to = from + Days::new(span);
        let amount = Decimal::new(cents, 2);
        let range = DateRange::between(from, to);
        let cash = AccountCode::new("1-01-001");

        let on_bounds = vec![
            posted_on(from, "1-01-001", "3-01-001", amount),
            posted_on(to, "1-01-001", "3-01-001", amount),
        ];
        let outside = vec![
            posted_on(from - Days::new(1), "1-01-001", "3-01-001", amount),
            posted_on(to + Days::new(1), "1-01-001", "3-01-001", amount),
        ];

        prop_assert_eq!(
            BalanceEngine::account_balance(&on_bounds, &cash, &range, true),
            amount + amount
        );
        prop_assert_eq!(
            BalanceEngine::account_balance(&outside, &cash, &range, true),
            Decimal::ZERO
        );
    }

    #[test]
    fn prop_balance_is_debits_minus_credits(
        legs in prop::collection::vec((any::<bool>(), 1i64..100_000), 0..30),
    ) {
        let cash = AccountCode::new("1-01-001");
        let mut expected = Decimal::ZERO;
        let txns: Vec<Transaction> = legs
            .iter()
            .map(|(is_debit, cents)| {
                let amount = Decimal::new(*cents, 2);
                if *is_debit {
                    expected += amount;
                    posted_on(base_date(), "1-01-001", "4-01-001", amount)
                } else {
                    expected -= amount;
                    posted_on(base_date(), "5-01-001", "1-01-001", amount)
                }
            })
            .collect();

        let first = BalanceEngine::account_balance(&txns, &cash, &DateRange::unbounded(), true);
        let second = BalanceEngine::account_balance(&txns, &cash, &DateRange::unbounded(), true);
        prop_assert_eq!(first, expected);
        prop_assert_eq!(first, second);
    }
}
