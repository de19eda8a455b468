//! Storage module for persisting harvested records
//!
//! This module handles the append-only record table:
//! - Creating or resetting the table with its fixed header
//! - Counting existing rows to derive the resume point
//! - Appending one record per successfully extracted item

mod csv_store;
mod traits;

pub use csv_store::CsvStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens the record table
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `reset` - Whether to discard existing rows
///
/// # Returns
///
/// * `Ok(CsvStore)` - Table ready for appends
/// * `Err(StorageError)` - Failed to create or read the table
pub fn open_store(path: &Path, reset: bool) -> StorageResult<CsvStore> {
    CsvStore::initialize(path, reset)
}
