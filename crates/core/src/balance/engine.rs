//! Account balance replay.

use std::collections::BTreeMap;

use gims_shared::types::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{DateRange, Transaction};

/// Debit and credit totals for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// Sum of amounts where the account is the debit leg.
    pub debit_total: Decimal,
    /// Sum of amounts where the account is the credit leg.
    pub credit_total: Decimal,
}

impl AccountTotals {
    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
    }

    /// Raw signed balance, `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

/// Stateless balance calculator.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Returns true if `txn` takes part in a computation over `range`.
    ///
    /// The transaction must be effective (see [`Transaction::is_effective`]),
    /// dated inside the window, and not a provisional `FEE_DUE` entry unless
    /// `include_provisional` is set.
    #[must_use]
    pub fn counts(txn: &Transaction, range: &DateRange, include_provisional: bool) -> bool {
        txn.is_effective()
            && range.contains(txn.date)
            && (include_provisional || !txn.kind.is_provisional())
    }

    /// Signed contribution of one transaction to `code`.
    ///
    /// `+amount` on the debit leg, `-amount` on the credit leg, zero when the
    /// account is not touched. A transaction with both legs on `code` is
    /// malformed and contributes nothing.
    #[must_use]
    pub fn contribution(txn: &Transaction, code: &AccountCode) -> Decimal {
        let on_debit = &txn.debit_account == code;
        let on_credit = &txn.credit_account == code;
        match (on_debit, on_credit) {
            (true, false) => txn.amount,
            (false, true) => -txn.amount,
            (true, true) | (false, false) => Decimal::ZERO,
        }
    }

    /// Sum of debits minus sum of credits to `code` over counted transactions.
    ///
    /// # Arguments
    ///
    /// * `transactions` - The ledger contents
    /// * `code` - Level-3 account code
    /// * `range` - Inclusive date window
    /// * `include_provisional` - Whether `FEE_DUE` entries count
    ///
    /// # Returns
    ///
    /// Zero when nothing matches. Never fails.
    pub fn account_balance<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        code: &AccountCode,
        range: &DateRange,
        include_provisional: bool,
    ) -> Decimal {
        Self::account_totals(transactions, code, range, include_provisional).net()
    }

    /// Debit and credit totals for `code` over counted transactions.
    pub fn account_totals<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        code: &AccountCode,
        range: &DateRange,
        include_provisional: bool,
    ) -> AccountTotals {
        let mut totals = AccountTotals::default();
        for txn in transactions {
            if !Self::counts(txn, range, include_provisional) {
                continue;
            }
            match (&txn.debit_account == code, &txn.credit_account == code) {
                (true, false) => totals.add_debit(txn.amount),
                (false, true) => totals.add_credit(txn.amount),
                (true, true) | (false, false) => {}
            }
        }
        totals
    }

    /// Totals for every account touched by a counted transaction, in one pass.
    pub fn totals_by_account<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        range: &DateRange,
        include_provisional: bool,
    ) -> BTreeMap<AccountCode, AccountTotals> {
        let mut totals: BTreeMap<AccountCode, AccountTotals> = BTreeMap::new();
        for txn in transactions {
            if !Self::counts(txn, range, include_provisional) || txn.debit_account == txn.credit_account {
                continue;
            }
            totals
                .entry(txn.debit_account.clone())
                .or_default()
                .add_debit(txn.amount);
            totals
                .entry(txn.credit_account.clone())
                .or_default()
                .add_credit(txn.amount);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionStatus, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn posted(kind: TransactionType, on: NaiveDate, debit: &str, credit: &str, amount: Decimal) -> Transaction {
        let mut txn = Transaction::new(kind, on, debit, credit, amount);
        txn.status = TransactionStatus::Posted;
        txn
    }

    fn code(value: &str) -> AccountCode {
        AccountCode::new(value)
    }

    #[test]
    fn test_empty_ledger_is_zero() {
        let none: Vec<Transaction> = Vec::new();
        assert_eq!(
            BalanceEngine::account_balance(&none, &code("1-01-001"), &DateRange::unbounded(), true),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_debit_adds_credit_subtracts() {
        let txns = vec![
            posted(TransactionType::Crv, date(1, 1), "1-01-001", "4-01-001", dec!(5000)),
            posted(TransactionType::Cpv, date(1, 2), "5-01-001", "1-01-001", dec!(2000)),
        ];
        let cash = code("1-01-001");
        assert_eq!(
            BalanceEngine::account_balance(&txns, &cash, &DateRange::unbounded(), true),
            dec!(3000)
        );
        let totals = BalanceEngine::account_totals(&txns, &cash, &DateRange::unbounded(), true);
        assert_eq!(totals.debit_total, dec!(5000));
        assert_eq!(totals.credit_total, dec!(2000));
        assert_eq!(
            BalanceEngine::account_balance(&txns, &code("4-01-001"), &DateRange::unbounded(), true),
            dec!(-5000)
        );
    }

    #[test]
    fn test_only_effective_transactions_count() {
        let mut pending = posted(TransactionType::Crv, date(1, 1), "1-01-001", "4-01-001", dec!(100));
        pending.status = TransactionStatus::Pending;
        let mut rejected = pending.clone();
        rejected.id = gims_shared::types::TransactionId::new();
        rejected.status = TransactionStatus::Rejected;
        let txns = vec![pending, rejected];
        assert_eq!(
            BalanceEngine::account_balance(&txns, &code("1-01-001"), &DateRange::unbounded(), true),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_fee_due_excluded_unless_provisional() {
        let txns = vec![posted(
            TransactionType::FeeDue,
            date(1, 1),
            "1-01-004",
            "4-01-001",
            dec!(750),
        )];
        let receivable = code("1-01-004");
        assert_eq!(
            BalanceEngine::account_balance(&txns, &receivable, &DateRange::unbounded(), false),
            Decimal::ZERO
        );
        assert_eq!(
            BalanceEngine::account_balance(&txns, &receivable, &DateRange::unbounded(), true),
            dec!(750)
        );
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let txns = vec![
            posted(TransactionType::Jv, date(3, 1), "1-01-001", "3-01-001", dec!(1)),
            posted(TransactionType::Jv, date(3, 31), "1-01-001", "3-01-001", dec!(10)),
            posted(TransactionType::Jv, date(2, 29), "1-01-001", "3-01-001", dec!(100)),
            posted(TransactionType::Jv, date(4, 1), "1-01-001", "3-01-001", dec!(1000)),
        ];
        let march = DateRange::between(date(3, 1), date(3, 31));
        assert_eq!(
            BalanceEngine::account_balance(&txns, &code("1-01-001"), &march, true),
            dec!(11)
        );
        let inverted = DateRange::between(date(3, 31), date(3, 1));
        assert_eq!(
            BalanceEngine::account_balance(&txns, &code("1-01-001"), &inverted, true),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_self_transfer_ignored() {
        let txns = vec![posted(TransactionType::Jv, date(1, 1), "1-01-001", "1-01-001", dec!(50))];
        assert_eq!(
            BalanceEngine::account_balance(&txns, &code("1-01-001"), &DateRange::unbounded(), true),
            Decimal::ZERO
        );
        assert!(BalanceEngine::totals_by_account(&txns, &DateRange::unbounded(), true).is_empty());
    }

    #[test]
    fn test_totals_by_account_matches_single_account() {
        let txns = vec![
            posted(TransactionType::Crv, date(1, 1), "1-01-001", "4-01-001", dec!(5000)),
            posted(TransactionType::Cpv, date(1, 2), "5-01-001", "1-01-001", dec!(2000)),
            posted(TransactionType::FeeDue, date(1, 3), "1-01-004", "4-01-001", dec!(900)),
        ];
        let range = DateRange::unbounded();
        let all = BalanceEngine::totals_by_account(&txns, &range, true);
        for (code, totals) in &all {
            assert_eq!(*totals, BalanceEngine::account_totals(&txns, code, &range, true));
        }
        assert_eq!(all.len(), 4);
    }
}
