//! Fee receipts from the collection desk.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use gims_shared::types::AccountCode;
use rust_decimal::Decimal;
use serde_json::Value;

use super::amount_detail;
use super::error::GenerationError;
use crate::ledger::{Transaction, TransactionType};
use crate::receivable::Student;

/// Component key that requires a hospital name.
const HOSPITAL_COMPONENT: &str = "hospital";
/// Component key that carries a fine type.
const FINE_COMPONENT: &str = "fine";

/// What the desk is recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptKind {
    /// Cash or bank received straight into fee income (`FEE_RCV`).
    Collection,
    /// Cash or bank received against outstanding dues (`FEE_RCV`, credits the receivable).
    Settlement,
    /// A charge billed to the student (`FEE_DUE`).
    Liability,
}

/// A fee receipt being filled in at the desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeReceipt {
    /// Fee components keyed by head, e.g. `"tuition"`, `"hospital"`.
    pub components: BTreeMap<String, Decimal>,
    /// Hospital the hospital fee is paid for.
    pub hospital_name: Option<String>,
    /// Kind of fine charged.
    pub fine_type: Option<String>,
    /// Cash or bank account receiving the money.
    pub payment_account: AccountCode,
    /// Posting date.
    pub date: NaiveDate,
}

impl FeeReceipt {
    /// Starts an empty receipt paid into `payment_account`.
    #[must_use]
    pub fn new(payment_account: AccountCode, date: NaiveDate) -> Self {
        Self {
            components: BTreeMap::new(),
            hospital_name: None,
            fine_type: None,
            payment_account,
            date,
        }
    }

    /// Adds an amount to a component.
    #[must_use]
    pub fn with_component(mut self, key: impl Into<String>, amount: Decimal) -> Self {
        *self.components.entry(key.into()).or_default() += amount;
        self
    }

    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.components.values().copied().sum()
    }

    fn charges(&self, key: &str) -> bool {
        self.components
            .get(key)
            .is_some_and(|amount| *amount > Decimal::ZERO)
    }

    /// Checks the receipt can be recorded.
    ///
    /// # Errors
    ///
    /// Returns `NegativeComponent`, `NonPositiveTotal`, or
    /// `HospitalNameRequired`.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if let Some((key, _)) = self
            .components
            .iter()
            .find(|(_, amount)| amount.is_sign_negative() && !amount.is_zero())
        {
            return Err(GenerationError::NegativeComponent(key.clone()));
        }
        if self.total() <= Decimal::ZERO {
            return Err(GenerationError::NonPositiveTotal);
        }
        let has_hospital_name = self
            .hospital_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if self.charges(HOSPITAL_COMPONENT) && !has_hospital_name {
            return Err(GenerationError::HospitalNameRequired);
        }
        Ok(())
    }

    /// Builds the `Draft` transaction for `student`.
    ///
    /// The caller records it with the actor's initial status.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn build(
        &self,
        kind: ReceiptKind,
        student: &Student,
        receivable_code: &AccountCode,
        fee_income_code: &AccountCode,
    ) -> Result<Transaction, GenerationError> {
        self.validate()?;

        let (txn_type, debit, credit) = match kind {
            ReceiptKind::Collection => (
                TransactionType::FeeRcv,
                self.payment_account.clone(),
                fee_income_code.clone(),
            ),
            ReceiptKind::Settlement => (
                TransactionType::FeeRcv,
                self.payment_account.clone(),
                receivable_code.clone(),
            ),
            ReceiptKind::Liability => (
                TransactionType::FeeDue,
                receivable_code.clone(),
                fee_income_code.clone(),
            ),
        };

        let mut txn = Transaction::new(txn_type, self.date, debit, credit, self.total())
            .with_description(format!("Fee Collection - {} ({})", student.name, student.semester))
            .with_student(student.admission_no.clone());
        txn.voucher_no = format!("RCPT/{}/{}", self.date.year(), Self::receipt_number(&txn));

        for (key, amount) in &self.components {
            txn.details.insert(key.clone(), amount_detail(*amount));
        }
        if self.charges(HOSPITAL_COMPONENT) {
            if let Some(name) = &self.hospital_name {
                txn.details.insert("hospitalName".into(), Value::String(name.clone()));
            }
        }
        if self.charges(FINE_COMPONENT) {
            if let Some(fine_type) = &self.fine_type {
                txn.details.insert("fineType".into(), Value::String(fine_type.clone()));
            }
        }
        Ok(txn)
    }

    fn receipt_number(txn: &Transaction) -> String {
        let simple = txn.id.into_inner().simple().to_string();
        simple.get(simple.len().saturating_sub(6)..).unwrap_or_default().to_uppercase()
    }
}
