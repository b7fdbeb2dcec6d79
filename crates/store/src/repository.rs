//! Loading and persisting a whole book.

use gims_core::{BookParts, FinanceBook, LedgerSettings};
use gims_shared::AppConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::blob::{BlobStore, FsBlobStore};
use crate::error::StoreError;

const ACCOUNTS: &str = "accounts";
const TRANSACTIONS: &str = "transactions";
const STUDENTS: &str = "students";
const AUDIT_LOGS: &str = "auditLogs";

/// Reads and writes the book's collections as separate blobs.
///
/// Every load reads every collection and every persist writes every
/// collection; there is no partial save.
#[derive(Debug)]
pub struct BookRepository<S> {
    store: S,
    key_prefix: String,
    settings: LedgerSettings,
}

impl BookRepository<FsBlobStore> {
    /// Opens the filesystem store named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: &AppConfig) -> Result<Self, StoreError> {
        let store = FsBlobStore::open(&config.store.data_dir)?;
        Ok(Self::new(
            store,
            config.store.key_prefix.clone(),
            LedgerSettings::from(&config.ledger),
        ))
    }
}

impl<S: BlobStore> BookRepository<S> {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: S, key_prefix: impl Into<String>, settings: LedgerSettings) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            settings,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full key of a collection.
    #[must_use]
    pub fn key(&self, collection: &str) -> String {
        format!("{}{collection}", self.key_prefix)
    }

    /// Loads the book. Missing collections load as empty.
    ///
    /// Cached student balances are checked against the ledger and every
    /// drift is logged; they are not corrected here.
    ///
    /// # Errors
    ///
    /// Returns an error if a blob cannot be read or parsed, or the
    /// collections do not form a valid book.
    pub fn load(&self) -> Result<FinanceBook, StoreError> {
        let parts = BookParts {
            accounts: self.read_collection(ACCOUNTS)?,
            transactions: self.read_collection(TRANSACTIONS)?,
            students: self.read_collection(STUDENTS)?,
            audit_log: self.read_collection(AUDIT_LOGS)?,
        };
        let book = FinanceBook::from_parts(self.settings.clone(), parts)?;

        for drift in book.reconcile() {
            warn!(
                student_id = %drift.student_id,
                cached = %drift.cached,
                expected = %drift.expected,
                "Student balance out of step with the ledger"
            );
        }
        info!(
            accounts = book.chart().len(),
            transactions = book.ledger().len(),
            students = book.students().len(),
            "Book loaded"
        );
        Ok(book)
    }

    /// Writes every collection of the book.
    ///
    /// # Errors
    ///
    /// Returns an error if a blob cannot be serialized or written.
    pub fn persist(&self, book: &FinanceBook) -> Result<(), StoreError> {
        let accounts: Vec<_> = book.chart().iter().collect();
        let students: Vec<_> = book.students().iter().collect();
        self.write_collection(ACCOUNTS, &accounts)?;
        self.write_collection(TRANSACTIONS, book.ledger().as_slice())?;
        self.write_collection(STUDENTS, &students)?;
        self.write_collection(AUDIT_LOGS, book.audit_log().entries())?;
        debug!(transactions = book.ledger().len(), "Book persisted");
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let key = self.key(collection);
        match self.store.read(&key)? {
            Some(contents) => {
                serde_json::from_str(&contents).map_err(|source| StoreError::Json { key, source })
            }
            None => Ok(Vec::new()),
        }
    }

    fn write_collection<T: Serialize + ?Sized>(&self, collection: &str, items: &T) -> Result<(), StoreError> {
        let key = self.key(collection);
        let contents = serde_json::to_string_pretty(items).map_err(|source| StoreError::Json {
            key: key.clone(),
            source,
        })?;
        self.store.write(&key, &contents)
    }
}
