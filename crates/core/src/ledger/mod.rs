//! Transaction ledger: two-leg financial entries and their store.
//!
//! The ledger is the system of record. It holds every transaction in
//! insertion order and exposes the query surface used by the balance
//! engine and reports. Status changes are driven by the workflow module.

pub mod error;
pub mod filter;
pub mod journal;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use filter::{DateRange, TransactionFilter};
pub use journal::TransactionLedger;
pub use transaction::{
    ChequeStatus, Transaction, TransactionEdit, TransactionStatus, TransactionType,
};
