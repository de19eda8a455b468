//! CSV-backed record store

use crate::record::{AnimeRecord, COLUMNS};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Flat CSV table with the fixed [`COLUMNS`] header
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Opens the table at `path`, creating it when needed
    ///
    /// The file is (re)written with only the header row when `reset` is set,
    /// when it does not exist, or when it is empty. An existing file whose
    /// header differs from [`COLUMNS`] is rejected rather than appended to.
    /// A trailing row left unterminated by an interrupted write is dropped.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    /// * `reset` - Discard any existing rows
    pub fn initialize(path: &Path, reset: bool) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
        };

        let is_empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        if reset || is_empty {
            store.write_header()?;
            tracing::info!("Initialized {} with header only", path.display());
        } else {
            store.check_header()?;
            store.drop_partial_row()?;
            tracing::debug!("Opened existing table {}", path.display());
        }

        Ok(store)
    }

    /// Counts the rows of an existing table without touching the disk
    ///
    /// A missing or empty file holds no rows. A file with a foreign header is
    /// rejected as in [`CsvStore::initialize`].
    pub fn existing_rows(path: &Path) -> StorageResult<usize> {
        let is_empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        if is_empty {
            return Ok(0);
        }

        let store = Self {
            path: path.to_path_buf(),
        };
        store.check_header()?;
        store.count_rows()
    }

    /// Reads every stored record in row order
    pub fn records(&self) -> StorageResult<Vec<AnimeRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(records)
    }

    fn write_header(&self) -> StorageResult<()> {
        let mut writer = WriterBuilder::new().from_writer(File::create(&self.path)?);
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        Ok(())
    }

    /// Cuts the file back to its last newline when the final row is unterminated
    fn drop_partial_row(&self) -> StorageResult<()> {
        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let len = file.seek(SeekFrom::End(0))?;
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] == b'\n' {
            return Ok(());
        }

        let mut content = Vec::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_end(&mut content)?;

        match content.iter().rposition(|&b| b == b'\n') {
            Some(end) => {
                tracing::warn!(
                    "Dropping unterminated last row of {} ({} bytes)",
                    self.path.display(),
                    len - end as u64 - 1
                );
                file.set_len(end as u64 + 1)?;
            }
            // Only the header, missing its terminator
            None => file.write_all(b"\n")?,
        }
        Ok(())
    }

    fn check_header(&self) -> StorageResult<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if found != COLUMNS {
            return Err(StorageError::HeaderMismatch {
                path: self.path.display().to_string(),
                found,
            });
        }
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn count_rows(&self) -> StorageResult<usize> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut count = 0;
        for row in reader.records() {
            row?;
            count += 1;
        }
        Ok(count)
    }

    fn append(&mut self, record: &AnimeRecord) -> StorageResult<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
