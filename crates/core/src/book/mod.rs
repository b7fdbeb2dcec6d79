//! The explicit store object the collaborators work through.
//!
//! [`FinanceBook`] owns the chart, the ledger, the roster and the audit
//! trail, and applies every workflow transition together with its
//! receivable side effect. Loading and saving stay outside: a book is built
//! from [`BookParts`] and handed back as [`BookParts`].

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod book_props;

pub use error::BookError;
pub use service::FinanceBook;
pub use types::{BookParts, LedgerSettings};
