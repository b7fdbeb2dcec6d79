//! Report data types.

use chrono::NaiveDate;
use gims_shared::types::{AccountCode, StudentId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountCategory;
use crate::ledger::{DateRange, TransactionType};

/// One account row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: AccountCode,
    /// Account name, or the code if the account is not in the chart.
    pub name: String,
    /// Account category, if known.
    pub category: Option<AccountCategory>,
    /// Balance when it is a debit, else zero.
    pub debit: Decimal,
    /// Absolute balance when it is a credit, else zero.
    pub credit: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// First included date. `None` means from the first entry.
    pub since: Option<NaiveDate>,
    /// Last included date. `None` means everything.
    pub as_of: Option<NaiveDate>,
    /// Non-zero accounts in code order.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// One account line of a statement, presented on its normal side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account code.
    pub code: AccountCode,
    /// Account name.
    pub name: String,
    /// Amount, positive when the account holds its normal balance.
    pub amount: Decimal,
}

/// A statement section with its total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Non-zero lines in code order.
    pub lines: Vec<StatementLine>,
    /// Section total.
    pub total: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Reporting period.
    pub period: DateRange,
    /// Income, excluding billed-but-uncollected dues.
    pub income: StatementSection,
    /// Expenses, including every posted entry.
    pub expenses: StatementSection,
    /// Income minus expenses.
    pub net_result: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// First included date. `None` means from the first entry.
    pub since: Option<NaiveDate>,
    /// Last included date. `None` means everything.
    pub as_of: Option<NaiveDate>,
    /// Asset accounts.
    pub assets: StatementSection,
    /// Liability accounts.
    pub liabilities: StatementSection,
    /// Equity accounts.
    pub equity: StatementSection,
    /// Income minus expenses up to `as_of`, shown under equity.
    pub current_profit: Decimal,
    /// Liabilities plus equity plus current profit.
    pub total_liabilities_and_equity: Decimal,
    /// Assets minus the other side. Zero for consistent entries.
    pub difference: Decimal,
}

/// One row of a general or student ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Posting date.
    pub date: NaiveDate,
    /// Transaction id.
    pub transaction_id: TransactionId,
    /// Voucher number.
    pub voucher_no: String,
    /// Voucher type.
    pub kind: TransactionType,
    /// Narrative.
    pub description: String,
    /// Debit amount on this row.
    pub debit: Decimal,
    /// Credit amount on this row.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// General ledger for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerReport {
    /// Account code.
    pub account_code: AccountCode,
    /// Account name, if the account is in the chart.
    pub account_name: Option<String>,
    /// Reporting period.
    pub period: DateRange,
    /// Rows sorted by date then id.
    pub rows: Vec<LedgerRow>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Last running balance, zero when there are no rows.
    pub closing_balance: Decimal,
}

/// Ledger card for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLedgerReport {
    /// Student.
    pub student_id: StudentId,
    /// Student name, if the student is on the roster.
    pub student_name: Option<String>,
    /// Rows sorted by date then id.
    pub rows: Vec<LedgerRow>,
    /// Sum of billed amounts.
    pub total_billed: Decimal,
    /// Sum of paid amounts.
    pub total_paid: Decimal,
    /// Billed minus paid.
    pub closing_balance: Decimal,
}

/// Which transactions a summary lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryScope {
    /// Every posted, non-provisional transaction.
    #[default]
    All,
    /// Credit leg is an income account.
    Receipts,
    /// Debit leg is an expense account.
    Payments,
}

/// One row of the transaction summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Posting date.
    pub date: NaiveDate,
    /// Transaction id.
    pub transaction_id: TransactionId,
    /// Voucher number.
    pub voucher_no: String,
    /// Voucher type.
    pub kind: TransactionType,
    /// Narrative.
    pub description: String,
    /// Debit leg.
    pub debit_account: AccountCode,
    /// Credit leg.
    pub credit_account: AccountCode,
    /// Amount.
    pub amount: Decimal,
}

/// Transaction summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummaryReport {
    /// Reporting period.
    pub period: DateRange,
    /// Which transactions are listed.
    pub scope: SummaryScope,
    /// Rows sorted by date then id.
    pub rows: Vec<SummaryRow>,
    /// Sum of amounts.
    pub total: Decimal,
}

/// How students are grouped in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentGrouping {
    /// By programme of study.
    Program,
    /// By affiliating board.
    Board,
    /// By campus.
    Campus,
}

/// One group of the program, board or campus summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummaryRow {
    /// Programme, board or campus name.
    pub group: String,
    /// Students in the group.
    pub student_count: usize,
    /// Fees collected from the group.
    pub collected: Decimal,
    /// Outstanding receivable of the group.
    pub receivable: Decimal,
    /// Collected plus receivable.
    pub total: Decimal,
}

/// Program, board or campus summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummaryReport {
    /// Grouping used.
    pub grouping: StudentGrouping,
    /// Groups sorted by name.
    pub rows: Vec<GroupSummaryRow>,
    /// Sum of collected.
    pub total_collected: Decimal,
    /// Sum of receivable.
    pub total_receivable: Decimal,
}

/// Fee figures of one programme and semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassProjection {
    /// Programme of study.
    pub program: String,
    /// Semester label.
    pub semester: String,
    /// One monthly tuition instalment.
    pub monthly: Decimal,
    /// Tuition for the semester.
    pub semester_fee: Decimal,
    /// Tuition for two semesters.
    pub yearly: Decimal,
}

/// Projected revenue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueProjectionReport {
    /// Sum of every student's course fee.
    pub total_potential: Decimal,
    /// Effective fee collections to date.
    pub total_collected: Decimal,
    /// Sum of cached student balances.
    pub total_dues: Decimal,
    /// One row per programme and semester with enrolled students.
    pub classes: Vec<ClassProjection>,
}

/// Cash position and receivables on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummaryReport {
    /// Last included date.
    pub as_of: NaiveDate,
    /// Balance of the cash account.
    pub cash_in_hand: Decimal,
    /// Combined balance of the bank accounts.
    pub bank_balance: Decimal,
    /// Fee collections in the month of `as_of`, up to `as_of`.
    pub month_collection: Decimal,
    /// Sum of positive student balances.
    pub total_receivable: Decimal,
    /// Students on the roster.
    pub student_count: usize,
    /// Per-campus figures.
    pub campuses: Vec<GroupSummaryRow>,
}
