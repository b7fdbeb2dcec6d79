//! The transaction ledger store.

use gims_shared::types::{StudentId, TransactionId};

use super::error::LedgerError;
use super::filter::TransactionFilter;
use super::transaction::{Transaction, TransactionStatus};

/// Ordered, append-mostly store of transactions.
///
/// The ledger enforces identity (unique ids) and nothing else. Amount and
/// account checks happen in [`super::validation`] before a caller appends,
/// and status rules live in the workflow module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from a persisted list, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if two records share an id.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for txn in transactions {
            ledger.append(txn)?;
        }
        Ok(ledger)
    }

    /// Appends a transaction.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if the id is already present.
    pub fn append(&mut self, txn: Transaction) -> Result<(), LedgerError> {
        if self.contains(txn.id) {
            return Err(LedgerError::DuplicateTransaction(txn.id));
        }
        self.transactions.push(txn);
        Ok(())
    }

    /// Replaces a transaction in place, returning the previous record.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no record has `replacement.id`.
    pub fn mutate(&mut self, replacement: Transaction) -> Result<Transaction, LedgerError> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == replacement.id)
            .ok_or(LedgerError::TransactionNotFound(replacement.id))?;
        Ok(std::mem::replace(slot, replacement))
    }

    /// Sets the status of a transaction, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn set_status(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
        status_before_delete: Option<TransactionStatus>,
    ) -> Result<TransactionStatus, LedgerError> {
        let txn = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        let previous = txn.status;
        txn.status = status;
        txn.status_before_delete = status_before_delete;
        Ok(previous)
    }

    /// Permanently removes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn remove(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        Ok(self.transactions.remove(index))
    }

    /// Looks up a transaction by id.
    #[must_use]
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Looks up a transaction that must exist.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn require(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.get(id).ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Returns true if a transaction with this id exists.
    #[must_use]
    pub fn contains(&self, id: TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// Transactions matching `filter`, in insertion order.
    pub fn query<'a>(&'a self, filter: &'a TransactionFilter) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |txn| filter.matches(txn))
    }

    /// Transactions in a given status, in insertion order.
    pub fn with_status(&self, status: TransactionStatus) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |txn| txn.status == status)
    }

    /// A student's transaction carrying the given voucher number.
    #[must_use]
    pub fn find_by_voucher(&self, student_id: &StudentId, voucher_no: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| {
            txn.voucher_no == voucher_no && txn.student_id.as_ref() == Some(student_id)
        })
    }

    /// All transactions in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Iterates over all transactions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Number of transactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns true if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Consumes the ledger, returning the persisted list.
    #[must_use]
    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }
}

impl<'a> IntoIterator for &'a TransactionLedger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
