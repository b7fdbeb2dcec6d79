use anyhow::Context;
use chrono::{Local, Month, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gims_core::FinanceBook;
use gims_core::generation::{FeeHead, FeeReceipt, FeeSchedule, ReceiptKind, StudentFilter};
use gims_core::ledger::{DateRange, Transaction, TransactionEdit, TransactionStatus, TransactionType};
use gims_core::reports::{StudentGrouping, SummaryScope};
use gims_core::workflow::{Actor, UserRole};
use gims_shared::types::{AccountCode, StudentId, TransactionId};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "gims", version, about = "Institute ledger: reports, approvals and fee generation")]
pub struct Cli {
    /// User recorded in the audit trail.
    #[arg(long, global = true, default_value = "admin")]
    user: String,
    /// Role of the user: cashier, accountant, finance-manager or admin.
    #[arg(long, global = true, default_value = "admin", value_parser = parse_role)]
    role: UserRole,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a voucher.
    Record(RecordArgs),
    /// Record a fee receipt from the collection desk.
    Receipt(ReceiptArgs),
    /// Submit a draft for posting or review.
    Submit(IdArgs),
    /// Change a voucher's date, narrative, legs or amount.
    Edit(EditArgs),
    /// Print a report.
    Report(ReportArgs),
    /// List an approvals queue.
    Queue(QueueArgs),
    /// Approve a pending or rejected transaction.
    Approve(IdArgs),
    /// Reject a pending transaction.
    Reject(RejectArgs),
    /// Ask for a transaction to be deleted.
    RequestDelete(IdArgs),
    /// Withdraw a deletion request.
    CancelDelete(IdArgs),
    /// Delete a transaction whose deletion was requested.
    ConfirmDelete(IdArgs),
    /// Generate a batch of fee dues for the roster.
    Generate(GenerateArgs),
    /// Balance of one account.
    Balance(BalanceArgs),
    /// Compare cached student balances with the ledger.
    Reconcile(ReconcileArgs),
}

#[derive(Args)]
struct RecordArgs {
    /// Voucher type, e.g. JV, CPV, FEE_DUE.
    #[arg(long = "type", value_parser = parse_type)]
    kind: TransactionType,
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: NaiveDate,
    #[arg(long, value_name = "CODE")]
    debit: String,
    #[arg(long, value_name = "CODE")]
    credit: String,
    #[arg(long)]
    amount: Decimal,
    #[arg(long, value_name = "ADMISSION_NO")]
    student: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    voucher_no: Option<String>,
    /// Keep as a draft instead of submitting.
    #[arg(long, default_value_t = false)]
    draft: bool,
}

#[derive(Args)]
struct ReceiptArgs {
    #[arg(long, value_name = "ADMISSION_NO")]
    student: String,
    #[arg(long, value_enum, default_value_t = ReceiptKindArg::Collection)]
    kind: ReceiptKindArg,
    /// Cash or bank account receiving the money.
    #[arg(long, value_name = "CODE", default_value = "1-01-001")]
    account: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: NaiveDate,
    /// Fee component, repeatable, e.g. `--component tuition=8000`.
    #[arg(long = "component", value_name = "KEY=AMOUNT", value_parser = parse_component, required = true)]
    components: Vec<(String, Decimal)>,
    #[arg(long)]
    hospital: Option<String>,
    #[arg(long)]
    fine_type: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReceiptKindArg {
    Collection,
    Settlement,
    Liability,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    id: TransactionId,
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_name = "CODE")]
    debit: Option<String>,
    #[arg(long, value_name = "CODE")]
    credit: Option<String>,
    #[arg(long)]
    amount: Option<Decimal>,
}

#[derive(Args)]
struct ReportArgs {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand)]
enum ReportCommand {
    TrialBalance(AsOfArgs),
    IncomeStatement(PeriodArgs),
    BalanceSheet(AsOfArgs),
    Ledger(LedgerArgs),
    Student(StudentArgs),
    Summary(SummaryArgs),
    Groups(GroupArgs),
    Projection,
    Position(PositionArgs),
}

#[derive(Args)]
struct AsOfArgs {
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,
}

#[derive(Args)]
struct PeriodArgs {
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Args)]
struct PositionArgs {
    /// Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

#[derive(Args)]
struct LedgerArgs {
    #[arg(long, value_name = "CODE")]
    account: String,
    #[command(flatten)]
    period: PeriodArgs,
}

#[derive(Args)]
struct StudentArgs {
    #[arg(long, value_name = "ADMISSION_NO")]
    id: String,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    period: PeriodArgs,
    #[arg(long, value_enum, default_value_t = ScopeArg::All)]
    scope: ScopeArg,
}

#[derive(Args)]
struct GroupArgs {
    #[arg(long, value_enum, default_value_t = GroupingArg::Program)]
    by: GroupingArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    All,
    Receipts,
    Payments,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupingArg {
    Program,
    Board,
    Campus,
}

#[derive(Args)]
struct QueueArgs {
    #[arg(value_enum)]
    queue: QueueArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum QueueArg {
    Pending,
    Rejected,
    DeletePending,
}

#[derive(Args)]
struct IdArgs {
    #[arg(long)]
    id: TransactionId,
}

#[derive(Args)]
struct RejectArgs {
    #[arg(long)]
    id: TransactionId,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Fee head: tuition, admission, registration, exam, fine or other.
    #[arg(long, value_parser = parse_head)]
    head: FeeHead,
    #[arg(long = "from-month", value_name = "MONTH")]
    month_from: Month,
    #[arg(long = "to-month", value_name = "MONTH")]
    month_to: Month,
    #[arg(long)]
    year: i32,
    /// Posting date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: NaiveDate,
    #[arg(long, value_name = "YYYY-MM-DD")]
    due_date: Option<NaiveDate>,
    /// Flat amount per student.
    #[arg(long)]
    amount: Option<Decimal>,
    #[arg(long)]
    program: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long)]
    campus: Option<String>,
    #[arg(long)]
    board: Option<String>,
}

#[derive(Args)]
struct BalanceArgs {
    #[arg(long, value_name = "CODE")]
    account: String,
    #[command(flatten)]
    period: PeriodArgs,
    /// Leave out `FEE_DUE` entries.
    #[arg(long, default_value_t = false)]
    cash_basis: bool,
}

#[derive(Args)]
struct ReconcileArgs {
    /// Reset drifted balances from the ledger.
    #[arg(long, default_value_t = false)]
    fix: bool,
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    UserRole::parse(value).ok_or_else(|| format!("unknown role '{value}'"))
}

fn parse_head(value: &str) -> Result<FeeHead, String> {
    FeeHead::parse(value).ok_or_else(|| format!("unknown fee head '{value}'"))
}

fn parse_type(value: &str) -> Result<TransactionType, String> {
    TransactionType::parse(value).ok_or_else(|| format!("unknown voucher type '{value}'"))
}

fn parse_component(value: &str) -> Result<(String, Decimal), String> {
    let (key, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=AMOUNT, got '{value}'"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|err| format!("bad amount in '{value}': {err}"))?;
    Ok((key.trim().to_lowercase(), amount))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Cli {
    /// Runs the command against `book`. Returns true if the book changed.
    pub fn run(self, book: &mut FinanceBook) -> anyhow::Result<bool> {
        let actor = Actor::new(self.user, self.role);
        match self.command {
            Commands::Record(args) => {
                let mut txn = Transaction::new(args.kind, args.date, args.debit, args.credit, args.amount)
                    .with_description(args.description);
                if let Some(student) = args.student {
                    txn = txn.with_student(student);
                }
                if let Some(voucher_no) = args.voucher_no {
                    txn = txn.with_voucher_no(voucher_no);
                }
                let id = if args.draft {
                    book.record_with_status(txn, TransactionStatus::Draft, &actor)
                } else {
                    book.record(txn, &actor)
                }
                .context("record failed")?;
                print_json(&book.transaction(id))?;
                Ok(true)
            }
            Commands::Receipt(args) => {
                let mut receipt = FeeReceipt::new(AccountCode::new(args.account), args.date);
                for (key, amount) in args.components {
                    receipt = receipt.with_component(key, amount);
                }
                receipt.hospital_name = args.hospital;
                receipt.fine_type = args.fine_type;
                let kind = match args.kind {
                    ReceiptKindArg::Collection => ReceiptKind::Collection,
                    ReceiptKindArg::Settlement => ReceiptKind::Settlement,
                    ReceiptKindArg::Liability => ReceiptKind::Liability,
                };
                let id = book
                    .record_receipt(&receipt, kind, &StudentId::new(args.student), &actor)
                    .context("receipt failed")?;
                print_json(&book.transaction(id))?;
                Ok(true)
            }
            Commands::Submit(args) => {
                let status = book.submit(args.id, &actor).context("submit failed")?;
                print_json(&status)?;
                Ok(true)
            }
            Commands::Edit(args) => {
                let changes = TransactionEdit {
                    date: args.date,
                    description: args.description,
                    debit_account: args.debit.map(AccountCode::new),
                    credit_account: args.credit.map(AccountCode::new),
                    amount: args.amount,
                };
                book.edit(args.id, &changes, &actor).context("edit failed")?;
                print_json(&book.transaction(args.id))?;
                Ok(true)
            }
            Commands::Report(args) => {
                run_report(book, args.command)?;
                Ok(false)
            }
            Commands::Queue(args) => {
                let rows: Vec<_> = match args.queue {
                    QueueArg::Pending => book.pending().collect(),
                    QueueArg::Rejected => book.rejected().collect(),
                    QueueArg::DeletePending => book.delete_pending().collect(),
                };
                print_json(&rows)?;
                Ok(false)
            }
            Commands::Approve(args) => {
                let status = book.approve(args.id, &actor).context("approve failed")?;
                print_json(&status)?;
                Ok(true)
            }
            Commands::Reject(args) => {
                let status = book.reject(args.id, &actor, args.reason).context("reject failed")?;
                print_json(&status)?;
                Ok(true)
            }
            Commands::RequestDelete(args) => {
                let status = book.request_delete(args.id, &actor).context("delete request failed")?;
                print_json(&status)?;
                Ok(true)
            }
            Commands::CancelDelete(args) => {
                let status = book.cancel_delete(args.id, &actor).context("cancel failed")?;
                print_json(&status)?;
                Ok(true)
            }
            Commands::ConfirmDelete(args) => {
                let removed = book.confirm_delete(args.id, &actor).context("delete failed")?;
                print_json(&removed)?;
                Ok(true)
            }
            Commands::Generate(args) => {
                let mut schedule = FeeSchedule::new(args.head, args.month_from, args.month_to, args.year, args.date);
                schedule.due_date = args.due_date.unwrap_or(args.date);
                schedule.amount_override = args.amount;
                schedule.filter = StudentFilter {
                    program: args.program,
                    semester: args.semester,
                    campus: args.campus,
                    board: args.board,
                };
                let batch = book.generate_fees(&schedule, &actor).context("fee generation failed")?;
                print_json(&serde_json::json!({
                    "batchId": batch.batch_id,
                    "count": batch.len(),
                    "total": batch.total(),
                }))?;
                Ok(true)
            }
            Commands::Balance(args) => {
                let balance = book.account_balance(
                    &AccountCode::new(args.account),
                    &args.period.range(),
                    !args.cash_basis,
                );
                print_json(&balance)?;
                Ok(false)
            }
            Commands::Reconcile(args) => {
                let drifts = if args.fix {
                    book.rebuild_balances()
                } else {
                    book.reconcile()
                };
                print_json(&drifts)?;
                Ok(args.fix && !drifts.is_empty())
            }
        }
    }
}

fn run_report(book: &FinanceBook, command: ReportCommand) -> anyhow::Result<()> {
    match command {
        ReportCommand::TrialBalance(args) => print_json(&book.trial_balance(args.as_of)),
        ReportCommand::IncomeStatement(args) => print_json(&book.income_statement(args.range())),
        ReportCommand::BalanceSheet(args) => print_json(&book.balance_sheet(args.as_of)),
        ReportCommand::Ledger(args) => {
            print_json(&book.general_ledger(&AccountCode::new(args.account), args.period.range()))
        }
        ReportCommand::Student(args) => print_json(&book.student_ledger(&StudentId::new(args.id))),
        ReportCommand::Summary(args) => {
            let scope = match args.scope {
                ScopeArg::All => SummaryScope::All,
                ScopeArg::Receipts => SummaryScope::Receipts,
                ScopeArg::Payments => SummaryScope::Payments,
            };
            print_json(&book.transaction_summary(args.period.range(), scope))
        }
        ReportCommand::Groups(args) => {
            let grouping = match args.by {
                GroupingArg::Program => StudentGrouping::Program,
                GroupingArg::Board => StudentGrouping::Board,
                GroupingArg::Campus => StudentGrouping::Campus,
            };
            print_json(&book.group_summary(grouping))
        }
        ReportCommand::Projection => print_json(&book.revenue_projection()),
        ReportCommand::Position(args) => {
            let as_of = args.date.unwrap_or_else(|| Local::now().date_naive());
            print_json(&book.position_summary(as_of))
        }
    }
}
