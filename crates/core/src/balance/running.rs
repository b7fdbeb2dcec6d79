//! Running balance for row-by-row ledger reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running balance information for one report row.
///
/// - `current_balance[N] = previous_balance[N] + change[N]`
/// - `previous_balance[N] = current_balance[N-1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Row number, starting at 1.
    pub sequence: u32,
    /// Balance before this row.
    pub previous_balance: Decimal,
    /// Balance after this row.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Running balance for the first row, starting from zero.
    #[must_use]
    pub fn first_entry(change: Decimal) -> Self {
        Self {
            sequence: 1,
            previous_balance: Decimal::ZERO,
            current_balance: change,
        }
    }

    /// Running balance for the row after `previous`.
    #[must_use]
    pub fn next_entry(previous: &Self, change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + change,
        }
    }

    /// Advances from an optional previous row.
    #[must_use]
    pub fn advance(previous: Option<&Self>, change: Decimal) -> Self {
        match previous {
            Some(previous) => Self::next_entry(previous, change),
            None => Self::first_entry(change),
        }
    }
}
