//! Transaction model: a single fixed two-leg entry with a lifecycle status.
//!
//! Exactly one amount flows from the credit leg to the debit leg. Multi-leg
//! journals are not supported.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, BatchId, StudentId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Voucher classification.
///
/// Informational only: the balance engine never branches on the voucher type
/// except to exclude `FeeDue` from cash-basis views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Fee collected at the counter.
    Fee,
    /// Fee billed but not yet collected. Increases the receivable.
    FeeDue,
    /// Fee receipt against an outstanding due.
    FeeRcv,
    /// Cash payment voucher.
    Cpv,
    /// Cash receipt voucher.
    Crv,
    /// Bank payment voucher.
    Bpv,
    /// Bank receipt voucher.
    #[serde(alias = "BRP")]
    Brv,
    /// Journal voucher.
    Jv,
}

impl TransactionType {
    /// Returns the stored tag, e.g. `"FEE_DUE"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fee => "FEE",
            Self::FeeDue => "FEE_DUE",
            Self::FeeRcv => "FEE_RCV",
            Self::Cpv => "CPV",
            Self::Crv => "CRV",
            Self::Bpv => "BPV",
            Self::Brv => "BRV",
            Self::Jv => "JV",
        }
    }

    /// Returns true for billed-but-not-collected charges.
    #[must_use]
    pub const fn is_provisional(self) -> bool {
        matches!(self, Self::FeeDue)
    }

    /// Returns true for fee collections.
    #[must_use]
    pub const fn is_fee_collection(self) -> bool {
        matches!(self, Self::Fee | Self::FeeRcv)
    }

    /// Parses a stored tag.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "FEE" => Some(Self::Fee),
            "FEE_DUE" => Some(Self::FeeDue),
            "FEE_RCV" => Some(Self::FeeRcv),
            "CPV" => Some(Self::Cpv),
            "CRV" => Some(Self::Crv),
            "BPV" => Some(Self::Bpv),
            "BRV" | "BRP" => Some(Self::Brv),
            "JV" => Some(Self::Jv),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction status in the approval workflow.
///
/// Only `Posted` transactions count toward balances, with one exception:
/// a transaction awaiting deletion keeps counting until the deletion is
/// confirmed if it was `Posted` when the request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Being drafted, not yet submitted.
    Draft,
    /// Included in every balance computation.
    Posted,
    /// Waiting for approval.
    Pending,
    /// Refused by an approver. May be approved later.
    Rejected,
    /// Deletion requested, waiting for confirmation.
    DeletePending,
}

impl TransactionStatus {
    /// Returns the status as its stored string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Posted => "Posted",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
            Self::DeletePending => "DeletePending",
        }
    }

    /// Parses a stored status string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Draft" => Some(Self::Draft),
            "Posted" => Some(Self::Posted),
            "Pending" => Some(Self::Pending),
            "Rejected" => Some(Self::Rejected),
            "DeletePending" => Some(Self::DeletePending),
            _ => None,
        }
    }

    /// Returns true if amount, accounts and description may be edited.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Pending | Self::Posted)
    }

    /// Returns true if a transaction may be created in this status.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Draft | Self::Pending | Self::Posted)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clearing state of a cheque attached to a bank voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChequeStatus {
    /// Handed over, not yet presented.
    Issued,
    /// Honoured by the bank.
    Cleared,
    /// Returned unpaid.
    Bounced,
}

/// A two-leg ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique, time-ordered id. Tie-break for same-day ordering.
    pub id: TransactionId,
    /// Human-facing reference. Not guaranteed unique.
    pub voucher_no: String,
    /// Posting date.
    pub date: NaiveDate,
    /// Voucher classification.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Narrative.
    #[serde(default)]
    pub description: String,
    /// Account receiving the amount.
    pub debit_account: AccountCode,
    /// Account giving the amount.
    pub credit_account: AccountCode,
    /// Positive amount.
    pub amount: Decimal,
    /// Workflow status.
    pub status: TransactionStatus,
    /// Status held when a deletion was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_before_delete: Option<TransactionStatus>,
    /// Student whose receivable this entry affects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
    /// Batch that generated this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
    /// External reference number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_no: Option<String>,
    /// Cheque number for bank vouchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_no: Option<String>,
    /// Cheque clearing state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_status: Option<ChequeStatus>,
    /// User who recorded the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
    /// Department charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Free-form breakdown used for receipts. Ignored by balances.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl Transaction {
    /// Creates a `Draft` transaction with a fresh id.
    ///
    /// The voucher number defaults to the type tag followed by the id; use
    /// [`Transaction::with_voucher_no`] to set a human-friendly one.
    #[must_use]
    pub fn new(
        kind: TransactionType,
        date: NaiveDate,
        debit_account: impl Into<AccountCode>,
        credit_account: impl Into<AccountCode>,
        amount: Decimal,
    ) -> Self {
        let id = TransactionId::new();
        Self {
            id,
            voucher_no: format!("{}-{}", kind.as_str(), id.into_inner().simple()),
            date,
            kind,
            description: String::new(),
            debit_account: debit_account.into(),
            credit_account: credit_account.into(),
            amount,
            status: TransactionStatus::Draft,
            status_before_delete: None,
            student_id: None,
            batch_id: None,
            ref_no: None,
            cheque_no: None,
            cheque_status: None,
            recorded_by: None,
            department: None,
            details: BTreeMap::new(),
        }
    }

    /// Sets the voucher number.
    #[must_use]
    pub fn with_voucher_no(mut self, voucher_no: impl Into<String>) -> Self {
        self.voucher_no = voucher_no.into();
        self
    }

    /// Sets the narrative.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Links the transaction to a student.
    #[must_use]
    pub fn with_student(mut self, student_id: impl Into<StudentId>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Sets the recording user.
    #[must_use]
    pub fn with_recorded_by(mut self, user: impl Into<String>) -> Self {
        self.recorded_by = Some(user.into());
        self
    }

    /// Adds an entry to the free-form breakdown.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns true if the transaction currently contributes to balances.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        match self.status {
            TransactionStatus::Posted => true,
            TransactionStatus::DeletePending => {
                self.status_before_delete == Some(TransactionStatus::Posted)
            }
            TransactionStatus::Draft | TransactionStatus::Pending | TransactionStatus::Rejected => {
                false
            }
        }
    }

    /// Returns true if either leg names `code`.
    #[must_use]
    pub fn touches(&self, code: &AccountCode) -> bool {
        &self.debit_account == code || &self.credit_account == code
    }

    /// Human-facing reference used by the audit trail.
    #[must_use]
    pub fn reference(&self) -> String {
        if self.voucher_no.is_empty() {
            self.id.to_string()
        } else {
            self.voucher_no.clone()
        }
    }
}

/// Field changes applied by an edit. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEdit {
    /// New posting date.
    pub date: Option<NaiveDate>,
    /// New narrative.
    pub description: Option<String>,
    /// New debit leg.
    pub debit_account: Option<AccountCode>,
    /// New credit leg.
    pub credit_account: Option<AccountCode>,
    /// New amount.
    pub amount: Option<Decimal>,
}

impl TransactionEdit {
    /// Returns a copy of `original` with the edit applied.
    ///
    /// Identity, status and student link are never changed by an edit.
    #[must_use]
    pub fn apply_to(&self, original: &Transaction) -> Transaction {
        let mut edited = original.clone();
        if let Some(date) = self.date {
            edited.date = date;
        }
        if let Some(description) = &self.description {
            edited.description.clone_from(description);
        }
        if let Some(debit) = &self.debit_account {
            edited.debit_account = debit.clone();
        }
        if let Some(credit) = &self.credit_account {
            edited.credit_account = credit.clone();
        }
        if let Some(amount) = self.amount {
            edited.amount = amount;
        }
        edited
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[rstest]
    #[case(TransactionStatus::Draft, false)]
    #[case(TransactionStatus::Pending, false)]
    #[case(TransactionStatus::Rejected, false)]
    #[case(TransactionStatus::Posted, true)]
    fn test_is_effective(#[case] status: TransactionStatus, #[case] effective: bool) {
        let mut txn = Transaction::new(TransactionType::Jv, date(1), "1-01-001", "3-01-001", dec!(10));
        txn.status = status;
        assert_eq!(txn.is_effective(), effective);
    }

    #[test]
    fn test_delete_pending_keeps_prior_effect() {
        let mut txn = Transaction::new(TransactionType::Jv, date(1), "1-01-001", "3-01-001", dec!(10));
        txn.status = TransactionStatus::DeletePending;
        txn.status_before_delete = Some(TransactionStatus::Posted);
        assert!(txn.is_effective());
        txn.status_before_delete = Some(TransactionStatus::Pending);
        assert!(!txn.is_effective());
    }

    #[test]
    fn test_type_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&TransactionType::FeeDue).unwrap(),
            "\"FEE_DUE\""
        );
        let legacy: TransactionType = serde_json::from_str("\"BRP\"").unwrap();
        assert_eq!(legacy, TransactionType::Brv);
        assert_eq!(TransactionType::parse("fee_rcv"), Some(TransactionType::FeeRcv));
        assert_eq!(TransactionType::parse("XYZ"), None);
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            TransactionStatus::Draft,
            TransactionStatus::Posted,
            TransactionStatus::Pending,
            TransactionStatus::Rejected,
            TransactionStatus::DeletePending,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert!(!TransactionStatus::Rejected.is_editable());
        assert!(!TransactionStatus::DeletePending.is_initial());
    }

    #[test]
    fn test_transaction_json_shape() {
        let txn = Transaction::new(TransactionType::FeeDue, date(5), "1-01-004", "4-01-001", dec!(2500))
            .with_student("KMU-24-001")
            .with_voucher_no("VCH-1")
            .with_detail("tuition", "2500");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "FEE_DUE");
        assert_eq!(json["debitAccount"], "1-01-004");
        assert_eq!(json["studentId"], "KMU-24-001");
        assert_eq!(json["amount"], "2500");
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["details"]["tuition"], "2500");
        assert!(json.get("chequeNo").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_edit_preserves_identity() {
        let txn = Transaction::new(TransactionType::Crv, date(1), "1-01-001", "4-01-001", dec!(100))
            .with_student("KMU-24-001");
        let edit = TransactionEdit {
            amount: Some(dec!(150)),
            credit_account: Some(AccountCode::new("4-01-002")),
            ..TransactionEdit::default()
        };
        let edited = edit.apply_to(&txn);
        assert_eq!(edited.id, txn.id);
        assert_eq!(edited.amount, dec!(150));
        assert_eq!(edited.credit_account, AccountCode::new("4-01-002"));
        assert_eq!(edited.student_id, txn.student_id);
        assert!(!edit.is_empty());
        assert!(TransactionEdit::default().is_empty());
    }

    #[test]
    fn test_reference_falls_back_to_id() {
        let txn = Transaction::new(TransactionType::Jv, date(1), "1-01-001", "3-01-001", dec!(1))
            .with_voucher_no("");
        assert_eq!(txn.reference(), txn.id.to_string());
    }
}
