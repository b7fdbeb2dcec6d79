//! Chart of accounts.
//!
//! A three-level hierarchy: categories (level 1), groups (level 2) and
//! postable accounts (level 3). Only level-3 accounts may carry transactions.

pub mod chart;
pub mod error;
pub mod types;

#[cfg(test)]
mod chart_props;

pub use chart::ChartOfAccounts;
pub use error::AccountError;
pub use types::{Account, AccountCategory, AccountLevel, NormalBalance};
