//! Query surface over the ledger.

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, StudentId};
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionStatus, TransactionType};

/// Inclusive date window. A missing bound is unbounded on that side.
///
/// A window whose start is after its end matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First included date.
    pub from: Option<NaiveDate>,
    /// Last included date.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Every date.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { from: None, to: None }
    }

    /// `[from, to]`, both inclusive.
    #[must_use]
    pub const fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Everything up to and including `to`.
    #[must_use]
    pub const fn up_to(to: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// Returns true if `date` lies inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| from <= date) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns true if no date can match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Filter over transactions. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    status: Option<TransactionStatus>,
    range: DateRange,
    student_id: Option<StudentId>,
    account: Option<AccountCode>,
    kind: Option<TransactionType>,
}

impl TransactionFilter {
    /// Matches every transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one status.
    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to a date window.
    #[must_use]
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Restricts to one student.
    #[must_use]
    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    /// Restricts to transactions with either leg on `account`.
    #[must_use]
    pub fn account(mut self, account: AccountCode) -> Self {
        self.account = Some(account);
        self
    }

    /// Restricts to one voucher type.
    #[must_use]
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns true if `txn` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.status.is_none_or(|status| txn.status == status)
            && self.range.contains(txn.date)
            && self
                .student_id
                .as_ref()
                .is_none_or(|student| txn.student_id.as_ref() == Some(student))
            && self.account.as_ref().is_none_or(|account| txn.touches(account))
            && self.kind.is_none_or(|kind| txn.kind == kind)
    }
}
