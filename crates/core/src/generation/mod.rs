//! Fee generation.
//!
//! Builds well-formed transactions from enrollment data:
//! - Bulk `FEE_DUE` batches from a fee schedule and the roster
//! - Single fee receipts from the collection desk

pub mod bulk;
pub mod error;
pub mod receipt;
pub mod schedule;

#[cfg(test)]
mod schedule_props;

pub use bulk::{BulkGenerator, FeeBatch};
pub use error::GenerationError;
pub use receipt::{FeeReceipt, ReceiptKind};
pub use schedule::{FeeHead, FeeSchedule, StudentFilter, monthly_tuition};

use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// A fee amount as a JSON number for a transaction's details.
pub(crate) fn amount_detail(amount: Decimal) -> Value {
    let text = amount.normalize().to_string();
    match serde_json::from_str::<Number>(&text) {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(text),
    }
}
