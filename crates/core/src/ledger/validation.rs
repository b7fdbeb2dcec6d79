//! Transaction validation against the chart of accounts.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::transaction::Transaction;
use crate::accounts::ChartOfAccounts;

/// Validates that an amount is strictly positive.
///
/// # Errors
///
/// Returns `ZeroAmount` or `NegativeAmount`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    Ok(())
}

/// Validates both legs of a transaction.
///
/// Legs must be distinct, known, level-3 accounts.
///
/// # Errors
///
/// Returns `SameAccount` or the chart's reference error.
pub fn validate_legs(txn: &Transaction, chart: &ChartOfAccounts) -> Result<(), LedgerError> {
    if txn.debit_account == txn.credit_account {
        return Err(LedgerError::SameAccount(txn.debit_account.clone()));
    }
    chart.require_postable(&txn.debit_account)?;
    chart.require_postable(&txn.credit_account)?;
    Ok(())
}

/// Validates everything the ledger checks before accepting a transaction.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_transaction(txn: &Transaction, chart: &ChartOfAccounts) -> Result<(), LedgerError> {
    validate_amount(txn.amount)?;
    validate_legs(txn, chart)
}
