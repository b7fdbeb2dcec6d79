//! Integration tests for `BookRepository` over the filesystem store.

use std::fs;

use chrono::NaiveDate;
use gims_core::ledger::{Transaction, TransactionStatus, TransactionType};
use gims_core::receivable::Student;
use gims_core::workflow::{Actor, UserRole};
use gims_core::{FinanceBook, LedgerSettings};
use gims_shared::types::StudentId;
use gims_store::{BlobStore, BookRepository, FsBlobStore, MemoryBlobStore, StoreError};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn repository(dir: &TempDir) -> BookRepository<FsBlobStore> {
    let store = FsBlobStore::open(dir.path()).unwrap();
    BookRepository::new(store, "gims_", LedgerSettings::default())
}

fn sample_book() -> FinanceBook {
    let mut book = FinanceBook::new(LedgerSettings::default());
    book.admit_student(Student::new("KMU-24-001", "Ali Khan"));
    let admin = Actor::new("admin", UserRole::Admin);
    let cashier = Actor::new("cashier", UserRole::Cashier);
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    book.record(
        Transaction::new(TransactionType::FeeDue, date, "1-01-004", "4-01-001", dec!(5000))
            .with_student("KMU-24-001"),
        &admin,
    )
    .unwrap();
    book.record(
        Transaction::new(TransactionType::FeeRcv, date, "1-01-001", "1-01-004", dec!(1500))
            .with_student("KMU-24-001"),
        &cashier,
    )
    .unwrap();
    book
}

#[test]
fn test_empty_directory_loads_default_book() {
    let dir = TempDir::new().unwrap();
    let book = repository(&dir).load().unwrap();

    assert_eq!(book.chart().len(), 22);
    assert!(book.ledger().is_empty());
    assert!(book.students().is_empty());
}

#[test]
fn test_persist_then_load() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);
    let book = sample_book();

    repo.persist(&book).unwrap();
    for key in ["gims_accounts", "gims_transactions", "gims_students", "gims_auditLogs"] {
        assert!(dir.path().join(format!("{key}.json")).exists(), "{key} missing");
    }

    let loaded = repo.load().unwrap();
    assert_eq!(loaded.ledger(), book.ledger());
    assert_eq!(loaded.students(), book.students());
    assert_eq!(loaded.audit_log(), book.audit_log());
    assert_eq!(loaded.pending().count(), 1);
    assert_eq!(
        loaded.students().get(&StudentId::new("KMU-24-001")).unwrap().balance,
        dec!(5000)
    );
    assert!(loaded.reconcile().is_empty());
}

#[test]
fn test_stored_layout_uses_camel_case() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);
    repo.persist(&sample_book()).unwrap();

    let raw = fs::read_to_string(dir.path().join("gims_transactions.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["debitAccount"], "1-01-004");
    assert_eq!(first["type"], "FEE_DUE");
    assert_eq!(first["status"], "Posted");
    assert_eq!(first["studentId"], "KMU-24-001");
}

#[test]
fn test_load_keeps_drifted_cache_for_inspection() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);
    let book = sample_book();
    repo.persist(&book).unwrap();

    let students = r#"[{"admissionNo":"KMU-24-001","name":"Ali Khan","balance":"42"}]"#;
    repo.store().write("gims_students", students).unwrap();

    let mut loaded = repo.load().unwrap();
    let drifts = loaded.reconcile();
    assert_eq!(drifts.len(), 1);
    assert_eq!(drifts[0].cached, dec!(42));
    assert_eq!(drifts[0].expected, dec!(5000));

    loaded.rebuild_balances();
    repo.persist(&loaded).unwrap();
    assert!(repo.load().unwrap().reconcile().is_empty());
}

#[test]
fn test_malformed_blob_is_reported() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);
    repo.store().write("gims_transactions", "{not json").unwrap();

    let err = repo.load().unwrap_err();
    assert!(matches!(err, StoreError::Json { ref key, .. } if key == "gims_transactions"));
    assert_eq!(err.error_code(), "STORE_MALFORMED");
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir);
    let book = sample_book();
    let txn = book.ledger().as_slice()[0].clone();
    let twice = serde_json::to_string(&vec![txn.clone(), txn]).unwrap();
    repo.store().write("gims_transactions", &twice).unwrap();

    assert!(matches!(repo.load().unwrap_err(), StoreError::InvalidBook(_)));
}

#[test]
fn test_key_prefix_is_applied() {
    let repo = BookRepository::new(MemoryBlobStore::new(), "test_", LedgerSettings::default());
    repo.persist(&sample_book()).unwrap();

    assert_eq!(
        repo.store().keys(),
        vec!["test_accounts", "test_auditLogs", "test_students", "test_transactions"]
    );
    let loaded = repo.load().unwrap();
    assert_eq!(loaded.ledger().len(), 2);
    assert_eq!(
        loaded.transaction(loaded.ledger().as_slice()[1].id).unwrap().status,
        TransactionStatus::Pending
    );
}
