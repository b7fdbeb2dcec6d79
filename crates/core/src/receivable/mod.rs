//! Student receivable tracker.
//!
//! Each student caches the signed total of effective transactions that
//! touch the receivable account on their behalf. The cache is updated
//! incrementally by the workflow; [`ReceivableTracker::recompute`] is the
//! from-scratch oracle it must always agree with.

pub mod student;
pub mod tracker;

#[cfg(test)]
mod tracker_props;

pub use student::{Student, StudentRoster};
pub use tracker::{BalanceAdjustment, BalanceDrift, Direction, ReceivableTracker};
