//! The finance book: chart, ledger, roster and audit trail behind one API.
//!
//! Every mutating operation follows the same shape:
//!
//! 1. Look up and validate everything it touches.
//! 2. Ask [`WorkflowService`] for the transition.
//! 3. Plan the receivable adjustments.
//! 4. Commit the ledger change, the adjustments and the audit entry.
//!
//! Steps 1 to 3 never mutate, so a failure leaves the book exactly as it was
//! and a `&mut` borrow guarantees no reader sees step 4 half done.

use std::collections::HashSet;

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, BatchId, StudentId, TransactionId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::BookError;
use super::types::{BookParts, LedgerSettings};
use crate::accounts::ChartOfAccounts;
use crate::balance::BalanceEngine;
use crate::generation::{BulkGenerator, FeeBatch, FeeReceipt, FeeSchedule, GenerationError, ReceiptKind};
use crate::ledger::{
    DateRange, LedgerError, Transaction, TransactionEdit, TransactionFilter, TransactionLedger,
    TransactionStatus, validation,
};
use crate::reports::{
    BalanceSheetReport, GeneralLedgerReport, GroupSummaryReport, IncomeStatementReport,
    PositionSummaryReport, ReportService, RevenueProjectionReport, StudentGrouping,
    StudentLedgerReport, SummaryScope, TransactionSummaryReport, TrialBalanceReport,
};
use crate::receivable::{BalanceAdjustment, BalanceDrift, Direction, ReceivableTracker, Student, StudentRoster};
use crate::workflow::{AuditAction, AuditLog, BalanceEffect, Capability, WorkflowAction, WorkflowError, WorkflowService};

/// In-memory system of record.
#[derive(Debug, Clone)]
pub struct FinanceBook {
    settings: LedgerSettings,
    chart: ChartOfAccounts,
    ledger: TransactionLedger,
    students: StudentRoster,
    audit: AuditLog,
    tracker: ReceivableTracker,
}

impl FinanceBook {
    /// Creates an empty book on the default institute chart.
    #[must_use]
    pub fn new(settings: LedgerSettings) -> Self {
        Self::with_chart(settings, ChartOfAccounts::institute_default())
    }

    /// Creates an empty book on a given chart.
    #[must_use]
    pub fn with_chart(settings: LedgerSettings, chart: ChartOfAccounts) -> Self {
        let tracker = ReceivableTracker::new(settings.receivable_code.clone());
        Self {
            settings,
            chart,
            ledger: TransactionLedger::new(),
            students: StudentRoster::new(),
            audit: AuditLog::new(),
            tracker,
        }
    }

    /// Rebuilds a book from its stored collections.
    ///
    /// An empty account list falls back to the default chart. Cached student
    /// balances are taken as stored; use [`Self::reconcile`] to check them.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart is malformed or two transactions share an id.
    pub fn from_parts(settings: LedgerSettings, parts: BookParts) -> Result<Self, LedgerError> {
        let chart = if parts.accounts.is_empty() {
            ChartOfAccounts::institute_default()
        } else {
            ChartOfAccounts::from_accounts(parts.accounts)?
        };
        let mut book = Self::with_chart(settings, chart);
        book.ledger = TransactionLedger::from_transactions(parts.transactions)?;
        book.students = StudentRoster::from_students(parts.students);
        book.audit = AuditLog::from_entries(parts.audit_log);
        Ok(book)
    }

    /// Splits the book into its stored collections.
    #[must_use]
    pub fn into_parts(self) -> BookParts {
        BookParts {
            accounts: self.chart.into_accounts(),
            transactions: self.ledger.into_transactions(),
            students: self.students.into_students(),
            audit_log: self.audit.into_entries(),
        }
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Returns the chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Returns the transaction ledger.
    #[must_use]
    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    /// Returns the student roster.
    #[must_use]
    pub fn students(&self) -> &StudentRoster {
        &self.students
    }

    /// Returns the audit trail.
    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Returns the receivable tracker.
    #[must_use]
    pub fn tracker(&self) -> &ReceivableTracker {
        &self.tracker
    }

    /// Adds or replaces a student, keeping the cached balance of an existing one.
    pub fn admit_student(&mut self, mut student: Student) {
        if let Some(existing) = self.students.get(&student.admission_no) {
            student.balance = existing.balance;
        }
        debug!(student_id = %student.admission_no, "Student admitted");
        self.students.upsert(student);
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Records a transaction in the actor's initial status.
    ///
    /// # Errors
    ///
    /// See [`Self::record_with_status`].
    pub fn record(&mut self, txn: Transaction, actor: &impl Capability) -> Result<TransactionId, WorkflowError> {
        self.record_with_status(txn, actor.initial_status(), actor)
    }

    /// Records a transaction in an explicit initial status.
    ///
    /// # Errors
    ///
    /// Returns an error if the status is not an initial one, the actor may
    /// not use it, the amount or legs are invalid, the student is unknown,
    /// or the id is taken.
    pub fn record_with_status(
        &mut self,
        mut txn: Transaction,
        status: TransactionStatus,
        actor: &impl Capability,
    ) -> Result<TransactionId, WorkflowError> {
        let action = WorkflowService::create(status, actor)?;
        self.check_new(&txn)?;

        txn.status = status;
        txn.status_before_delete = None;
        if txn.recorded_by.is_none() {
            txn.recorded_by = Some(actor.actor_name().to_string());
        }

        let adjustments = self.plan(action.balance_effect(), None, Some(&txn))?;
        let id = txn.id;
        let reference = txn.reference();
        let extra = format!("{} {} {}", txn.kind, txn.amount, status);
        self.ledger.append(txn)?;
        self.tracker.commit(&mut self.students, adjustments);
        self.audit.record(action.audit_action(), reference, action.performed_by(), extra);

        debug!(transaction_id = %id, status = %status, "Transaction recorded");
        Ok(id)
    }

    /// Builds a fee receipt for a student and records it.
    ///
    /// Collections and settlements take the actor's initial status. A
    /// liability is a scheduled charge and is always posted.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is unknown, the receipt is invalid, or
    /// recording fails.
    pub fn record_receipt(
        &mut self,
        receipt: &FeeReceipt,
        kind: ReceiptKind,
        student_id: &StudentId,
        actor: &impl Capability,
    ) -> Result<TransactionId, BookError> {
        let student = self.students.require(student_id)?;
        let txn = receipt.build(
            kind,
            student,
            &self.settings.receivable_code,
            &self.settings.fee_income_code,
        )?;
        match kind {
            ReceiptKind::Collection | ReceiptKind::Settlement => Ok(self.record(txn, actor)?),
            ReceiptKind::Liability => {
                let id = txn.id;
                self.record_scheduled(vec![txn], None, actor)?;
                debug!(transaction_id = %id, "Fee liability posted");
                Ok(id)
            }
        }
    }

    /// Generates a fee batch from the roster and inserts it.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is billed, the actor may not post, or a row
    /// fails validation.
    pub fn generate_fees(&mut self, schedule: &FeeSchedule, actor: &impl Capability) -> Result<FeeBatch, BookError> {
        let generator = BulkGenerator::new(
            self.settings.receivable_code.clone(),
            self.settings.fee_income_code.clone(),
        );
        let batch = generator.generate(schedule, self.students.iter())?;
        self.insert_generated(batch.clone(), actor)?;
        Ok(batch)
    }

    /// Inserts a generated batch as posted entries, bypassing review.
    ///
    /// Every row is validated before any is inserted.
    ///
    /// # Errors
    ///
    /// Returns `EmptyBatch` if the batch has no rows, `NotAuthorized` if the
    /// actor cannot post directly, or the first row that fails validation.
    pub fn insert_generated(&mut self, batch: FeeBatch, actor: &impl Capability) -> Result<BatchId, BookError> {
        let batch_id = batch.batch_id;
        let total = batch.total();
        let count = batch.len();
        self.record_scheduled(batch.transactions, Some(batch_id), actor)?;
        info!(batch_id = %batch_id, count, total = %total, "Fee batch inserted");
        Ok(batch_id)
    }

    fn record_scheduled(
        &mut self,
        mut transactions: Vec<Transaction>,
        batch_id: Option<BatchId>,
        actor: &impl Capability,
    ) -> Result<(), BookError> {
        if !actor.can_post_directly() {
            return Err(WorkflowError::NotAuthorized {
                user: actor.actor_name().to_string(),
                operation: "post scheduled charges",
            }
            .into());
        }
        let Some(first) = transactions.first() else {
            return Err(GenerationError::EmptyBatch.into());
        };
        let (action, reference, extra) = match batch_id {
            Some(batch_id) => (
                AuditAction::BulkGenerate,
                batch_id.to_string(),
                format!("{} rows", transactions.len()),
            ),
            None => (
                AuditAction::Create,
                first.reference(),
                format!("{} {} Posted", first.kind, first.amount),
            ),
        };

        let mut seen: HashSet<TransactionId> = HashSet::with_capacity(transactions.len());
        let mut adjustments: Vec<BalanceAdjustment> = Vec::with_capacity(transactions.len());
        for txn in &mut transactions {
            self.check_new(txn)?;
            if !seen.insert(txn.id) {
                return Err(LedgerError::DuplicateTransaction(txn.id).into());
            }
            txn.status = TransactionStatus::Posted;
            txn.status_before_delete = None;
            if txn.recorded_by.is_none() {
                txn.recorded_by = Some(actor.actor_name().to_string());
            }
            adjustments.extend(self.plan(BalanceEffect::Apply, None, Some(&*txn))?);
        }

        for txn in transactions {
            self.ledger.append(txn)?;
        }
        self.tracker.commit(&mut self.students, adjustments);
        self.audit.record(action, reference, actor.actor_name(), extra);
        Ok(())
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Submits a draft in the actor's initial status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is unknown or not a draft.
    pub fn submit(&mut self, id: TransactionId, actor: &impl Capability) -> Result<TransactionStatus, WorkflowError> {
        let current = self.ledger.require(id)?.status;
        let action = WorkflowService::submit(current, actor)?;
        self.apply_status_change(id, &action, None, String::new())
    }

    /// Approves a pending transaction or restores a rejected one.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor cannot approve, the transaction is not
    /// pending or rejected, or its student is missing.
    pub fn approve(&mut self, id: TransactionId, actor: &impl Capability) -> Result<TransactionStatus, WorkflowError> {
        let current = self.ledger.require(id)?.status;
        let action = WorkflowService::approve(current, actor)?;
        self.apply_status_change(id, &action, None, format!("{current} -> Posted"))
    }

    /// Rejects a pending transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor cannot approve or the transaction is not pending.
    pub fn reject(
        &mut self,
        id: TransactionId,
        actor: &impl Capability,
        reason: Option<String>,
    ) -> Result<TransactionStatus, WorkflowError> {
        let current = self.ledger.require(id)?.status;
        let action = WorkflowService::reject(current, actor, reason)?;
        let extra = match &action {
            WorkflowAction::Reject {
                rejection_reason: Some(reason),
                ..
            } => reason.clone(),
            _ => String::new(),
        };
        self.apply_status_change(id, &action, None, extra)
    }

    /// Marks a posted or pending transaction for deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is in any other status.
    pub fn request_delete(&mut self, id: TransactionId, actor: &impl Capability) -> Result<TransactionStatus, WorkflowError> {
        let current = self.ledger.require(id)?.status;
        let action = WorkflowService::request_delete(current, actor)?;
        self.apply_status_change(id, &action, Some(current), format!("Was {current}"))
    }

    /// Withdraws a deletion request, restoring the earlier status.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor cannot approve or no deletion is pending.
    pub fn cancel_delete(&mut self, id: TransactionId, actor: &impl Capability) -> Result<TransactionStatus, WorkflowError> {
        let txn = self.ledger.require(id)?;
        let action = WorkflowService::cancel_delete(txn.status, txn.status_before_delete, actor)?;
        self.apply_status_change(id, &action, None, String::new())
    }

    /// Removes a transaction whose deletion was requested.
    ///
    /// The balance effect in force is reversed first. If the student it
    /// belongs to is missing, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor cannot approve, no deletion is pending,
    /// or the student is missing.
    pub fn confirm_delete(&mut self, id: TransactionId, actor: &impl Capability) -> Result<Transaction, WorkflowError> {
        let txn = self.ledger.require(id)?;
        let action = WorkflowService::confirm_delete(txn.status, txn.status_before_delete, actor)?;
        let adjustments = self.plan(action.balance_effect(), Some(txn), None)?;
        let reference = txn.reference();
        let extra = format!("{} {}", txn.kind, txn.amount);

        let removed = self.ledger.remove(id)?;
        self.tracker.commit(&mut self.students, adjustments);
        self.audit.record(action.audit_action(), reference, action.performed_by(), extra);

        info!(transaction_id = %id, user = action.performed_by(), "Transaction deleted");
        Ok(removed)
    }

    /// Edits a draft, pending or posted transaction.
    ///
    /// Posted edits swap the old balance effect for the new one in a single
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be edited by this actor,
    /// the edited record is invalid, or its student is missing.
    pub fn edit(
        &mut self,
        id: TransactionId,
        changes: &TransactionEdit,
        actor: &impl Capability,
    ) -> Result<Transaction, WorkflowError> {
        let original = self.ledger.require(id)?;
        let action = WorkflowService::edit(original.status, actor)?;
        let edited = changes.apply_to(original);
        validation::validate_transaction(&edited, &self.chart)?;

        let adjustments = self.plan(action.balance_effect(), Some(original), Some(&edited))?;
        let reference = original.reference();
        let extra = format!("Amount: {} -> {}", original.amount, edited.amount);

        let previous = self.ledger.mutate(edited)?;
        self.tracker.commit(&mut self.students, adjustments);
        self.audit.record(action.audit_action(), reference, action.performed_by(), extra);

        debug!(transaction_id = %id, user = action.performed_by(), "Transaction edited");
        Ok(previous)
    }

    fn apply_status_change(
        &mut self,
        id: TransactionId,
        action: &WorkflowAction,
        status_before_delete: Option<TransactionStatus>,
        extra: String,
    ) -> Result<TransactionStatus, WorkflowError> {
        let txn = self.ledger.require(id)?;
        let new_status = action.new_status().ok_or(WorkflowError::InvalidTransition {
            from: txn.status,
            to: txn.status,
        })?;
        let adjustments = self.plan(action.balance_effect(), Some(txn), Some(txn))?;
        let reference = txn.reference();

        let previous = self.ledger.set_status(id, new_status, status_before_delete)?;
        self.tracker.commit(&mut self.students, adjustments);
        self.audit.record(action.audit_action(), reference, action.performed_by(), extra);

        debug!(
            transaction_id = %id,
            from = %previous,
            to = %new_status,
            user = action.performed_by(),
            "Transaction status changed"
        );
        Ok(new_status)
    }

    fn check_new(&self, txn: &Transaction) -> Result<(), LedgerError> {
        validation::validate_transaction(txn, &self.chart)?;
        if let Some(student_id) = &txn.student_id {
            self.students.require(student_id)?;
        }
        if self.ledger.contains(txn.id) {
            return Err(LedgerError::DuplicateTransaction(txn.id));
        }
        Ok(())
    }

    fn plan(
        &self,
        effect: BalanceEffect,
        before: Option<&Transaction>,
        after: Option<&Transaction>,
    ) -> Result<Vec<BalanceAdjustment>, LedgerError> {
        let mut adjustments = Vec::new();
        let (reverse, apply) = match effect {
            BalanceEffect::None => (None, None),
            BalanceEffect::Apply => (None, after),
            BalanceEffect::Reverse => (before, None),
            BalanceEffect::Replace => (before, after),
        };
        if let Some(txn) = reverse {
            adjustments.extend(self.tracker.plan(&self.students, txn, Direction::Reverse)?);
        }
        if let Some(txn) = apply {
            adjustments.extend(self.tracker.plan(&self.students, txn, Direction::Apply)?);
        }
        Ok(adjustments)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Looks up a transaction.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.ledger.get(id)
    }

    /// Transactions matching a filter.
    pub fn query<'a>(&'a self, filter: &'a TransactionFilter) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.ledger.query(filter)
    }

    /// Transactions waiting for approval.
    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.with_status(TransactionStatus::Pending)
    }

    /// Rejected transactions.
    pub fn rejected(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.with_status(TransactionStatus::Rejected)
    }

    /// Transactions waiting for a deletion decision.
    pub fn delete_pending(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.with_status(TransactionStatus::DeletePending)
    }

    /// A student's transaction by voucher number.
    #[must_use]
    pub fn find_by_voucher(&self, student_id: &StudentId, voucher_no: &str) -> Option<&Transaction> {
        self.ledger.find_by_voucher(student_id, voucher_no)
    }

    /// Balance of one account over a window.
    #[must_use]
    pub fn account_balance(&self, code: &AccountCode, range: &DateRange, include_provisional: bool) -> Decimal {
        BalanceEngine::account_balance(&self.ledger, code, range, include_provisional)
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// `period` with a missing start replaced by the report epoch.
    fn report_window(&self, period: DateRange) -> DateRange {
        DateRange {
            from: period.from.or(Some(self.settings.report_epoch)),
            to: period.to,
        }
    }

    /// Trial balance from the report epoch up to a date.
    #[must_use]
    pub fn trial_balance(&self, as_of: Option<NaiveDate>) -> TrialBalanceReport {
        let window = self.report_window(DateRange { from: None, to: as_of });
        ReportService::trial_balance(&self.chart, self.ledger.as_slice(), window)
    }

    /// Income statement for a period.
    #[must_use]
    pub fn income_statement(&self, period: DateRange) -> IncomeStatementReport {
        ReportService::income_statement(&self.chart, self.ledger.as_slice(), self.report_window(period))
    }

    /// Balance sheet from the report epoch up to a date.
    #[must_use]
    pub fn balance_sheet(&self, as_of: Option<NaiveDate>) -> BalanceSheetReport {
        let window = self.report_window(DateRange { from: None, to: as_of });
        ReportService::balance_sheet(&self.chart, self.ledger.as_slice(), window)
    }

    /// General ledger for one account.
    #[must_use]
    pub fn general_ledger(&self, code: &AccountCode, period: DateRange) -> GeneralLedgerReport {
        ReportService::general_ledger(&self.chart, self.ledger.as_slice(), code, self.report_window(period))
    }

    /// Ledger card for one student.
    #[must_use]
    pub fn student_ledger(&self, student_id: &StudentId) -> StudentLedgerReport {
        ReportService::student_ledger(
            &self.students,
            self.ledger.as_slice(),
            student_id,
            &self.settings.receivable_code,
        )
    }

    /// Transaction listing for a period.
    #[must_use]
    pub fn transaction_summary(&self, period: DateRange, scope: SummaryScope) -> TransactionSummaryReport {
        ReportService::transaction_summary(&self.chart, self.ledger.as_slice(), self.report_window(period), scope)
    }

    /// Collections and receivables per programme, board or campus.
    #[must_use]
    pub fn group_summary(&self, grouping: StudentGrouping) -> GroupSummaryReport {
        ReportService::group_summary(&self.students, self.ledger.as_slice(), grouping)
    }

    /// Projected fee revenue per class.
    #[must_use]
    pub fn revenue_projection(&self) -> RevenueProjectionReport {
        ReportService::revenue_projection(&self.students, self.ledger.as_slice())
    }

    /// Cash, bank and receivable position from the report epoch to `as_of`.
    #[must_use]
    pub fn position_summary(&self, as_of: NaiveDate) -> PositionSummaryReport {
        ReportService::position_summary(
            &self.chart,
            &self.students,
            self.ledger.as_slice(),
            &self.settings.cash_code,
            &self.settings.receivable_code,
            Some(self.settings.report_epoch),
            as_of,
        )
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Students whose cached balance disagrees with the ledger.
    #[must_use]
    pub fn reconcile(&self) -> Vec<BalanceDrift> {
        self.tracker.reconcile(&self.students, &self.ledger)
    }

    /// Resets every cached balance from the ledger.
    pub fn rebuild_balances(&mut self) -> Vec<BalanceDrift> {
        self.tracker.rebuild(&mut self.students, &self.ledger)
    }
}
