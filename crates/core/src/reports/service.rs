//! Report generation service.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use gims_shared::types::{AccountCode, StudentId};
use rust_decimal::Decimal;

use super::types::{
    BalanceSheetReport, ClassProjection, GeneralLedgerReport, GroupSummaryReport, GroupSummaryRow,
    IncomeStatementReport, LedgerRow, PositionSummaryReport, RevenueProjectionReport,
    StatementLine, StatementSection, StudentGrouping, StudentLedgerReport, SummaryRow,
    SummaryScope, TransactionSummaryReport, TrialBalanceReport, TrialBalanceRow,
    TrialBalanceTotals,
};
use crate::accounts::{AccountCategory, ChartOfAccounts};
use crate::balance::{AccountTotals, BalanceEngine, RunningBalance};
use crate::generation::monthly_tuition;
use crate::ledger::{DateRange, Transaction};
use crate::receivable::{Student, StudentRoster};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance over every entry inside `window`.
    ///
    /// Each account with a non-zero balance gets one row: a positive raw
    /// balance in the debit column, a negative one (as its absolute value)
    /// in the credit column. Provisional dues are included.
    #[must_use]
    pub fn trial_balance(
        chart: &ChartOfAccounts,
        transactions: &[Transaction],
        window: DateRange,
    ) -> TrialBalanceReport {
        let rows: Vec<TrialBalanceRow> = BalanceEngine::totals_by_account(transactions, &window, true)
            .into_iter()
            .filter_map(|(code, totals)| {
                let net = totals.net();
                if net.is_zero() {
                    return None;
                }
                let account = chart.get(&code);
                Some(TrialBalanceRow {
                    name: account.map_or_else(|| code.to_string(), |a| a.name.clone()),
                    category: account.map(|a| a.category),
                    debit: net.max(Decimal::ZERO),
                    credit: (-net).max(Decimal::ZERO),
                    code,
                })
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        TrialBalanceReport {
            since: window.from,
            as_of: window.to,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates an income statement for `period`.
    ///
    /// Income is cash-basis and leaves out provisional `FEE_DUE` entries.
    /// Expenses count every effective entry.
    #[must_use]
    pub fn income_statement(
        chart: &ChartOfAccounts,
        transactions: &[Transaction],
        period: DateRange,
    ) -> IncomeStatementReport {
        let cash = BalanceEngine::totals_by_account(transactions, &period, false);
        let accrued = BalanceEngine::totals_by_account(transactions, &period, true);

        let income = Self::section(chart, AccountCategory::Income, &cash);
        let expenses = Self::section(chart, AccountCategory::Expense, &accrued);
        let net_result = income.total - expenses.total;

        IncomeStatementReport {
            period,
            income,
            expenses,
            net_result,
        }
    }

    /// Generates a balance sheet over `window`, usually up to an as-of date.
    ///
    /// Current profit is income minus expense over the same window, with
    /// provisional dues included so the receivable they raise is matched.
    #[must_use]
    pub fn balance_sheet(
        chart: &ChartOfAccounts,
        transactions: &[Transaction],
        window: DateRange,
    ) -> BalanceSheetReport {
        let totals = BalanceEngine::totals_by_account(transactions, &window, true);

        let assets = Self::section(chart, AccountCategory::Asset, &totals);
        let liabilities = Self::section(chart, AccountCategory::Liability, &totals);
        let equity = Self::section(chart, AccountCategory::Equity, &totals);
        let current_profit = Self::section(chart, AccountCategory::Income, &totals).total
            - Self::section(chart, AccountCategory::Expense, &totals).total;

        let total_liabilities_and_equity = liabilities.total + equity.total + current_profit;

        BalanceSheetReport {
            since: window.from,
            as_of: window.to,
            difference: assets.total - total_liabilities_and_equity,
            assets,
            liabilities,
            equity,
            current_profit,
            total_liabilities_and_equity,
        }
    }

    /// Generates the general ledger for one account.
    ///
    /// Rows are the counted entries touching `code`, oldest first, with ties
    /// broken by id. The running balance is raw `debit - credit`, so the
    /// closing balance equals [`BalanceEngine::account_balance`] over the
    /// same window. An unknown account yields an empty report.
    #[must_use]
    pub fn general_ledger(
        chart: &ChartOfAccounts,
        transactions: &[Transaction],
        code: &AccountCode,
        period: DateRange,
    ) -> GeneralLedgerReport {
        let mut entries: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| BalanceEngine::counts(t, &period, true))
            .filter(|t| !BalanceEngine::contribution(t, code).is_zero())
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let rows = Self::ledger_rows(entries.into_iter().map(|txn| {
            if &txn.debit_account == code {
                (txn, txn.amount, Decimal::ZERO)
            } else {
                (txn, Decimal::ZERO, txn.amount)
            }
        }));
        let (total_debit, total_credit, closing_balance) = Self::row_totals(&rows);

        GeneralLedgerReport {
            account_code: code.clone(),
            account_name: chart.get(code).map(|a| a.name.clone()),
            period,
            rows,
            total_debit,
            total_credit,
            closing_balance,
        }
    }

    /// Generates the ledger card for one student.
    ///
    /// A row is billed when it debits the receivable or is a `FEE_DUE`, and
    /// paid when it credits the receivable or is a fee collection. Other
    /// entries tagged with the student appear with zero columns.
    #[must_use]
    pub fn student_ledger(
        students: &StudentRoster,
        transactions: &[Transaction],
        student_id: &StudentId,
        receivable_code: &AccountCode,
    ) -> StudentLedgerReport {
        let mut entries: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.is_effective() && t.student_id.as_ref() == Some(student_id))
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let rows = Self::ledger_rows(entries.into_iter().map(|txn| {
            if &txn.debit_account == receivable_code || txn.kind.is_provisional() {
                (txn, txn.amount, Decimal::ZERO)
            } else if &txn.credit_account == receivable_code || txn.kind.is_fee_collection() {
                (txn, Decimal::ZERO, txn.amount)
            } else {
                (txn, Decimal::ZERO, Decimal::ZERO)
            }
        }));
        let (total_billed, total_paid, closing_balance) = Self::row_totals(&rows);

        StudentLedgerReport {
            student_id: student_id.clone(),
            student_name: students.get(student_id).map(|s| s.name.clone()),
            rows,
            total_billed,
            total_paid,
            closing_balance,
        }
    }

    /// Lists effective, non-provisional entries in `period`.
    #[must_use]
    pub fn transaction_summary(
        chart: &ChartOfAccounts,
        transactions: &[Transaction],
        period: DateRange,
        scope: SummaryScope,
    ) -> TransactionSummaryReport {
        let mut entries: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| BalanceEngine::counts(t, &period, false))
            .filter(|t| match scope {
                SummaryScope::All => true,
                SummaryScope::Receipts => {
                    chart.category_of(&t.credit_account) == Some(AccountCategory::Income)
                }
                SummaryScope::Payments => {
                    chart.category_of(&t.debit_account) == Some(AccountCategory::Expense)
                }
            })
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let rows: Vec<SummaryRow> = entries
            .into_iter()
            .map(|txn| SummaryRow {
                date: txn.date,
                transaction_id: txn.id,
                voucher_no: txn.voucher_no.clone(),
                kind: txn.kind,
                description: txn.description.clone(),
                debit_account: txn.debit_account.clone(),
                credit_account: txn.credit_account.clone(),
                amount: txn.amount,
            })
            .collect();
        let total = rows.iter().map(|r| r.amount).sum();

        TransactionSummaryReport {
            period,
            scope,
            rows,
            total,
        }
    }

    /// Groups students by programme, board or campus.
    ///
    /// `collected` sums effective fee collections tagged with a student of
    /// the group; `receivable` sums the cached balances.
    #[must_use]
    pub fn group_summary(
        students: &StudentRoster,
        transactions: &[Transaction],
        grouping: StudentGrouping,
    ) -> GroupSummaryReport {
        let group_of = |student: &Student| -> String {
            let name = match grouping {
                StudentGrouping::Program => &student.program,
                StudentGrouping::Board => &student.board,
                StudentGrouping::Campus => &student.campus,
            };
            if name.is_empty() {
                "Unassigned".to_string()
            } else {
                name.clone()
            }
        };

        let mut groups: BTreeMap<String, GroupSummaryRow> = BTreeMap::new();
        for student in students.iter() {
            let group = group_of(student);
            let row = groups
                .entry(group.clone())
                .or_insert_with(|| GroupSummaryRow {
                    group,
                    student_count: 0,
                    collected: Decimal::ZERO,
                    receivable: Decimal::ZERO,
                    total: Decimal::ZERO,
                });
            row.student_count += 1;
            row.receivable += student.balance;
        }

        for txn in transactions
            .iter()
            .filter(|t| t.is_effective() && t.kind.is_fee_collection())
        {
            let Some(student) = txn.student_id.as_ref().and_then(|id| students.get(id)) else {
                continue;
            };
            if let Some(row) = groups.get_mut(&group_of(student)) {
                row.collected += txn.amount;
            }
        }

        let rows: Vec<GroupSummaryRow> = groups
            .into_values()
            .map(|mut row| {
                row.total = row.collected + row.receivable;
                row
            })
            .collect();

        GroupSummaryReport {
            grouping,
            total_collected: rows.iter().map(|r| r.collected).sum(),
            total_receivable: rows.iter().map(|r| r.receivable).sum(),
            rows,
        }
    }

    /// Projects fee revenue from the roster.
    ///
    /// One class row per programme and semester, priced from the first
    /// student of that class on the roster. Students who have left and
    /// students without a programme get no class row but still count
    /// towards the totals.
    #[must_use]
    pub fn revenue_projection(students: &StudentRoster, transactions: &[Transaction]) -> RevenueProjectionReport {
        let mut classes: BTreeMap<(String, String), ClassProjection> = BTreeMap::new();
        for student in students.iter() {
            if student.has_left() || student.program.is_empty() {
                continue;
            }
            classes
                .entry((student.program.clone(), student.semester.clone()))
                .or_insert_with(|| ClassProjection {
                    program: student.program.clone(),
                    semester: student.semester.clone(),
                    monthly: monthly_tuition(student.tuition_fee),
                    semester_fee: student.tuition_fee,
                    yearly: student.tuition_fee * Decimal::TWO,
                });
        }

        RevenueProjectionReport {
            total_potential: students.iter().map(|s| s.total_course_fee).sum(),
            total_collected: Self::fee_collections(transactions, &DateRange::unbounded()),
            total_dues: students.iter().map(|s| s.balance).sum(),
            classes: classes.into_values().collect(),
        }
    }

    /// Summarises cash position and receivables as of one day.
    ///
    /// Bank accounts are the postable siblings of `cash_code`, other than
    /// the receivable account. Balances cover `[since, as_of]`; the month's
    /// collection runs from the first of the month of `as_of`.
    #[must_use]
    pub fn position_summary(
        chart: &ChartOfAccounts,
        students: &StudentRoster,
        transactions: &[Transaction],
        cash_code: &AccountCode,
        receivable_code: &AccountCode,
        since: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> PositionSummaryReport {
        let window = DateRange { from: since, to: Some(as_of) };
        let totals = BalanceEngine::totals_by_account(transactions, &window, true);
        let net = |code: &AccountCode| totals.get(code).map_or(Decimal::ZERO, AccountTotals::net);

        let bank_balance = chart
            .get(cash_code)
            .and_then(|cash| cash.parent_code.as_ref())
            .map_or(Decimal::ZERO, |group| {
                chart
                    .children(group)
                    .filter(|account| {
                        account.is_postable() && &account.code != cash_code && &account.code != receivable_code
                    })
                    .map(|account| net(&account.code))
                    .sum()
            });

        let month = DateRange::between(as_of.with_day(1).unwrap_or(as_of), as_of);

        PositionSummaryReport {
            as_of,
            cash_in_hand: net(cash_code),
            bank_balance,
            month_collection: Self::fee_collections(transactions, &month),
            total_receivable: students
                .iter()
                .map(|s| s.balance)
                .filter(Decimal::is_sign_positive)
                .sum(),
            student_count: students.len(),
            campuses: Self::group_summary(students, transactions, StudentGrouping::Campus).rows,
        }
    }

    fn fee_collections(transactions: &[Transaction], window: &DateRange) -> Decimal {
        transactions
            .iter()
            .filter(|t| t.is_effective() && t.kind.is_fee_collection() && window.contains(t.date))
            .map(|t| t.amount)
            .sum()
    }

    fn section(
        chart: &ChartOfAccounts,
        category: AccountCategory,
        totals: &BTreeMap<AccountCode, AccountTotals>,
    ) -> StatementSection {
        let normal = category.normal_balance();
        let lines: Vec<StatementLine> = chart
            .postable_in(category)
            .filter_map(|account| {
                let amount = normal.present(totals.get(&account.code)?.net());
                (!amount.is_zero()).then(|| StatementLine {
                    code: account.code.clone(),
                    name: account.name.clone(),
                    amount,
                })
            })
            .collect();
        let total = lines.iter().map(|l| l.amount).sum();
        StatementSection { lines, total }
    }

    fn ledger_rows<'a>(
        entries: impl Iterator<Item = (&'a Transaction, Decimal, Decimal)>,
    ) -> Vec<LedgerRow> {
        let mut running: Option<RunningBalance> = None;
        entries
            .map(|(txn, debit, credit)| {
                let next = RunningBalance::advance(running.as_ref(), debit - credit);
                running = Some(next);
                LedgerRow {
                    date: txn.date,
                    transaction_id: txn.id,
                    voucher_no: txn.voucher_no.clone(),
                    kind: txn.kind,
                    description: txn.description.clone(),
                    debit,
                    credit,
                    balance: next.current_balance,
                }
            })
            .collect()
    }

    fn row_totals(rows: &[LedgerRow]) -> (Decimal, Decimal, Decimal) {
        let debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let credit: Decimal = rows.iter().map(|r| r.credit).sum();
        let closing = rows.last().map_or(Decimal::ZERO, |r| r.balance);
        (debit, credit, closing)
    }
}
