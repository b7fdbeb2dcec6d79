//! Persistence layer for the GIMS ledger.
//!
//! This crate provides:
//! - A `BlobStore` abstraction over independently keyed JSON blobs
//! - Filesystem and in-memory stores
//! - `BookRepository`, which loads and persists a whole `FinanceBook`

pub mod blob;
pub mod error;
pub mod repository;

pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use error::StoreError;
pub use repository::BookRepository;
