//! Property-based tests for transaction validation.
//!
//! **Property: Only positive amounts on two distinct level-3 accounts are accepted**

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::transaction::{Transaction, TransactionType};
use super::validation::{validate_amount, validate_transaction};
use crate::accounts::ChartOfAccounts;

fn postable_code() -> impl Strategy<Value = String> {
    let codes: Vec<String> = ChartOfAccounts::institute_default()
        .postable()
        .map(|account| account.code.to_string())
        .collect();
    prop::sample::select(codes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_amount_sign_decides_validity(cents in -1_000_000i64..1_000_000) {
        let amount = Decimal::new(cents, 2);
        prop_assert_eq!(validate_amount(amount).is_ok(), cents > 0);
    }

    #[test]
    fn prop_distinct_postable_legs_accepted(
        debit in postable_code(),
        credit in postable_code(),
        cents in 1i64..10_000_000,
    ) {
        let chart = ChartOfAccounts::institute_default();
        let txn = Transaction::new(
            TransactionType::Jv,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            debit.as_str(),
            credit.as_str(),
            Decimal::new(cents, 2),
        );
        prop_assert_eq!(validate_transaction(&txn, &chart).is_ok(), debit != credit);
    }
}
