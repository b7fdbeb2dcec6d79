//! Financial report generation.
//!
//! Every report is a pure function of the chart of accounts and the ledger:
//! - Trial Balance
//! - Income Statement
//! - Balance Sheet
//! - General Ledger (one account)
//! - Student Ledger (one student)
//! - Transaction Summary
//! - Program / Board / Campus Summary
//! - Projected Revenue
//! - Position Summary (cash, bank and receivables on one day)
//!
//! Signs follow one rule: [`crate::accounts::AccountCategory::normal_balance`].

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
