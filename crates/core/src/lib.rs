//! Ledger engine for the GIMS institute management system.
//!
//! This crate contains pure business logic with ZERO storage or presentation dependencies.
//! Every operation works on explicit in-memory arguments; persistence lives in `gims-store`.
//!
//! # Modules
//!
//! - `accounts` - Three-level chart of accounts and normal balance rules
//! - `ledger` - Two-leg transactions and the transaction ledger
//! - `balance` - Balance engine (replay of posted transactions)
//! - `workflow` - Approval state machine, roles, and audit trail
//! - `receivable` - Students and the receivable balance tracker
//! - `generation` - Bulk fee generation and fee receipts
//! - `reports` - Trial balance, statements, and ledgers
//! - `book` - The store object tying the above together

pub mod accounts;
pub mod balance;
pub mod book;
pub mod generation;
pub mod ledger;
pub mod receivable;
pub mod reports;
pub mod workflow;

pub use book::{BookError, BookParts, FinanceBook, LedgerSettings};
