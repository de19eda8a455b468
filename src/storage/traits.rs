//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and
//! associated error types.

use crate::record::AnimeRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected header in {path}: {found:?}")]
    HeaderMismatch { path: String, found: Vec<String> },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only table of harvested records
///
/// Implementations never reorder or rewrite rows that were already appended.
pub trait RecordStore {
    /// Returns the number of data rows (header excluded)
    fn count_rows(&self) -> StorageResult<usize>;

    /// Appends one row after every existing row
    fn append(&mut self, record: &AnimeRecord) -> StorageResult<()>;
}
