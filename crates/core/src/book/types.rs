//! Book settings and persisted parts.

use chrono::NaiveDate;
use gims_shared::config::LedgerConfig;
use gims_shared::types::AccountCode;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::ledger::Transaction;
use crate::receivable::Student;
use crate::workflow::AuditEntry;

/// Well-known accounts and report defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Level-3 account holding cash in hand.
    pub cash_code: AccountCode,
    /// Level-3 account holding amounts owed by students.
    pub receivable_code: AccountCode,
    /// Income account credited by fee dues and fee receipts.
    pub fee_income_code: AccountCode,
    /// First date covered by reports that are not given a start.
    pub report_epoch: NaiveDate,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for LedgerSettings {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            cash_code: config.cash_code.clone(),
            receivable_code: config.receivable_code.clone(),
            fee_income_code: config.fee_income_code.clone(),
            report_epoch: config.report_epoch,
        }
    }
}

/// The independently stored collections a book is made of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookParts {
    /// Chart of accounts, any order.
    pub accounts: Vec<Account>,
    /// Ledger in insertion order.
    pub transactions: Vec<Transaction>,
    /// Roster with cached balances.
    pub students: Vec<Student>,
    /// Audit trail, oldest first.
    pub audit_log: Vec<AuditEntry>,
}
