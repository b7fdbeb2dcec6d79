//! Bulk `FEE_DUE` generation.

use gims_shared::types::{AccountCode, BatchId};
use rust_decimal::Decimal;
use tracing::info;

use super::amount_detail;
use super::error::GenerationError;
use super::schedule::FeeSchedule;
use crate::ledger::{Transaction, TransactionStatus, TransactionType};
use crate::receivable::Student;

/// A generated batch of dues sharing one batch id.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeBatch {
    /// Id stamped on every row.
    pub batch_id: BatchId,
    /// One posted `FEE_DUE` row per billed student.
    pub transactions: Vec<Transaction>,
}

impl FeeBatch {
    /// Sum of all rows.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.transactions.iter().map(|txn| txn.amount).sum()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns true if the batch has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Builds fee batches against a receivable and an income account.
#[derive(Debug, Clone)]
pub struct BulkGenerator {
    receivable_code: AccountCode,
    fee_income_code: AccountCode,
}

impl BulkGenerator {
    /// Creates a generator debiting `receivable_code` and crediting `fee_income_code`.
    #[must_use]
    pub fn new(receivable_code: AccountCode, fee_income_code: AccountCode) -> Self {
        Self {
            receivable_code,
            fee_income_code,
        }
    }

    /// Generates one `FEE_DUE` row per eligible student.
    ///
    /// Rows are created `Posted`: scheduled charges skip approval. Students
    /// whose amount comes out at zero are left out.
    ///
    /// # Errors
    ///
    /// Returns `NoEligibleStudents` if the filter matches nobody, and
    /// `EmptyBatch` if every eligible student's amount is zero.
    pub fn generate<'a>(
        &self,
        schedule: &FeeSchedule,
        students: impl IntoIterator<Item = &'a Student>,
    ) -> Result<FeeBatch, GenerationError> {
        let eligible: Vec<&Student> = students
            .into_iter()
            .filter(|student| schedule.filter.matches(student))
            .collect();
        if eligible.is_empty() {
            return Err(GenerationError::NoEligibleStudents);
        }

        let batch_id = BatchId::new();
        let batch_tag = Self::batch_tag(batch_id);
        let narrative = schedule.narrative();
        let month_span = schedule.month_span();

        let transactions: Vec<Transaction> = eligible
            .into_iter()
            .map(|student| (student, schedule.amount_for(student)))
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .enumerate()
            .map(|(index, (student, amount))| {
                let mut txn = Transaction::new(
                    TransactionType::FeeDue,
                    schedule.posting_date,
                    self.receivable_code.clone(),
                    self.fee_income_code.clone(),
                    amount,
                )
                .with_voucher_no(format!("VCH-{batch_tag}-{:04}", index + 1))
                .with_description(format!("{narrative} - {}", student.name))
                .with_student(student.admission_no.clone())
                .with_detail(schedule.head.detail_key(), amount_detail(amount))
                .with_detail("dueDate", schedule.due_date.to_string())
                .with_detail("months", month_span.clone());
                txn.status = TransactionStatus::Posted;
                txn.batch_id = Some(batch_id);
                txn
            })
            .collect();

        if transactions.is_empty() {
            return Err(GenerationError::EmptyBatch);
        }

        let batch = FeeBatch {
            batch_id,
            transactions,
        };
        info!(
            batch_id = %batch.batch_id,
            head = schedule.head.label(),
            rows = batch.len(),
            total = %batch.total(),
            "Fee batch generated"
        );
        Ok(batch)
    }

    fn batch_tag(batch_id: BatchId) -> String {
        let simple = batch_id.into_inner().simple().to_string();
        simple.get(simple.len().saturating_sub(6)..).unwrap_or_default().to_uppercase()
    }
}
