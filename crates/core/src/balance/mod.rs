//! Balance engine.
//!
//! Pure, read-only aggregation over the transaction ledger. Every figure is
//! recomputed by replaying transactions; nothing here mutates state.

pub mod engine;
pub mod running;

#[cfg(test)]
mod engine_props;

pub use crate::ledger::DateRange;
pub use engine::{AccountTotals, BalanceEngine};
pub use running::RunningBalance;
