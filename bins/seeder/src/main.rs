//! Development data seeder for the GIMS ledger.
//!
//! Seeds a handful of students, their admission and first-semester dues, and
//! a couple of receipts into the configured store.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Month, NaiveDate};
use gims_core::FinanceBook;
use gims_core::generation::{FeeHead, FeeReceipt, FeeSchedule, ReceiptKind};
use gims_core::receivable::Student;
use gims_core::workflow::{Actor, UserRole};
use gims_shared::AppConfig;
use gims_shared::types::{AccountCode, StudentId};
use gims_store::BookRepository;
use rust_decimal::Decimal;

struct SeedStudent {
    admission_no: &'static str,
    name: &'static str,
    program: &'static str,
    board: &'static str,
    campus: &'static str,
    tuition: i64,
    admission: i64,
    semesters: i64,
}

const STUDENTS: [SeedStudent; 4] = [
    SeedStudent {
        admission_no: "KMU-24-001",
        name: "Ali Khan",
        program: "BSN",
        board: "KMU",
        campus: "Main",
        tuition: 90_000,
        admission: 20_000,
        semesters: 8,
    },
    SeedStudent {
        admission_no: "KMU-24-002",
        name: "Ayesha Bibi",
        program: "BSN",
        board: "KMU",
        campus: "Main",
        tuition: 90_000,
        admission: 20_000,
        semesters: 8,
    },
    SeedStudent {
        admission_no: "PNC-24-001",
        name: "Sana Gul",
        program: "LHV",
        board: "PNC",
        campus: "City",
        tuition: 60_000,
        admission: 15_000,
        semesters: 4,
    },
    SeedStudent {
        admission_no: "KPK-24-001",
        name: "Rashid Minhas",
        program: "CNA",
        board: "KPK Medical Faculty",
        campus: "City",
        tuition: 45_000,
        admission: 10_000,
        semesters: 2,
    },
];

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = AppConfig::load()?;
    println!("Opening store at {}...", config.store.data_dir.display());
    let repository = BookRepository::open(&config)?;
    let mut book = repository.load()?;
    let admin = Actor::new("seeder", UserRole::Admin);

    println!("Seeding students...");
    seed_students(&mut book);

    if book.ledger().is_empty() {
        println!("Seeding fee dues...");
        seed_dues(&mut book, &admin)?;

        println!("Seeding receipts...");
        seed_receipts(&mut book, &admin)?;
    } else {
        println!("  Ledger already has entries, skipping transactions...");
    }

    repository.persist(&book)?;
    println!("Seeding complete!");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("invalid date {year}-{month}-{day}"))
}

/// Adds the sample students that are not already on the roster.
fn seed_students(book: &mut FinanceBook) {
    for seed in STUDENTS {
        let admission_no = seed.admission_no;
        if book.students().get(&StudentId::new(admission_no)).is_some() {
            println!("  {admission_no} already exists, skipping...");
            continue;
        }
        let mut student = Student::new(admission_no, seed.name);
        student.program = seed.program.to_string();
        student.board = seed.board.to_string();
        student.semester = "1st".to_string();
        student.campus = seed.campus.to_string();
        student.status = "Paid".to_string();
        student.tuition_fee = Decimal::from(seed.tuition);
        student.admission_fee = Decimal::from(seed.admission);
        student.total_course_fee = Decimal::from(seed.tuition * seed.semesters);
        book.admit_student(student);
        println!("  Created student: {admission_no} {}", seed.name);
    }
}

/// Bills admission fees and the first two months of tuition.
fn seed_dues(book: &mut FinanceBook, admin: &Actor) -> anyhow::Result<()> {
    let posting_date = date(2024, 1, 1)?;

    let admission = FeeSchedule::new(FeeHead::Admission, Month::January, Month::January, 2024, posting_date);
    let batch = book.generate_fees(&admission, admin)?;
    println!("  Admission fees: {} rows, total {}", batch.len(), batch.total());

    let tuition = FeeSchedule::new(FeeHead::Tuition, Month::January, Month::February, 2024, posting_date);
    let batch = book.generate_fees(&tuition, admin)?;
    println!("  Tuition fees: {} rows, total {}", batch.len(), batch.total());
    Ok(())
}

/// Records one settlement against dues and one direct collection.
fn seed_receipts(book: &mut FinanceBook, admin: &Actor) -> anyhow::Result<()> {
    let settlement = FeeReceipt::new(AccountCode::new("1-01-001"), date(2024, 1, 15)?)
        .with_component("admission", Decimal::from(20_000))
        .with_component("tuition", Decimal::from(15_000));
    let id = book.record_receipt(&settlement, ReceiptKind::Settlement, &StudentId::new("KMU-24-001"), admin)?;
    println!("  Settlement receipt: {id}");

    let collection = FeeReceipt::new(AccountCode::new("1-01-002"), date(2024, 1, 20)?)
        .with_component("exam", Decimal::from(2_500));
    let id = book.record_receipt(&collection, ReceiptKind::Collection, &StudentId::new("PNC-24-001"), admin)?;
    println!("  Collection receipt: {id}");
    Ok(())
}
