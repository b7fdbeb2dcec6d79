//! Property-based tests for fee schedules.
//!
//! **Property: Month count covers the span exactly once**

use chrono::{Month, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::schedule::{FeeHead, FeeSchedule};
use crate::receivable::Student;

fn arb_month() -> impl Strategy<Value = Month> {
    (0u8..12).prop_map(|n| Month::try_from(n + 1).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Stepping month by month from `from` reaches `to` after exactly
    /// `month_count - 1` steps.
    #[test]
    fn prop_month_count_matches_walk(from in arb_month(), to in arb_month()) {
        let schedule = FeeSchedule::new(
            FeeHead::Tuition,
            from,
            to,
            2024,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let count = schedule.month_count();
        prop_assert!((1..=12).contains(&count));

        let mut month = from;
        for _ in 1..count {
            month = month.succ();
        }
        prop_assert_eq!(month, to);
    }

    /// Tuition is linear in the month count.
    #[test]
    fn prop_tuition_linear_in_months(fee in 0i64..500_000, from in arb_month(), to in arb_month()) {
        let mut student = Student::new("KMU-24-001", "Ali Khan");
        student.tuition_fee = Decimal::from(fee);
        let span = FeeSchedule::new(FeeHead::Tuition, from, to, 2024, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let single = FeeSchedule::new(FeeHead::Tuition, from, from, 2024, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        prop_assert_eq!(
            span.amount_for(&student),
            single.amount_for(&student) * Decimal::from(span.month_count())
        );
    }
}
