use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use tracing::{debug, info};

use crate::domain::{ExpenseRecord, EXPENSE_COLUMNS};

use super::{ExpenseStore, StoreError};

/// Flat-file store: one CSV file with a `Date,Category,Amount,Description`
/// header, read and rewritten in full on every operation.
///
/// There is no locking and no atomic rename. Two processes mutating the same
/// file concurrently can lose one of the updates; callers are expected to be
/// the only writer.
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file is missing or has no content at all.
    fn is_absent(&self) -> Result<bool, StoreError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ExpenseStore for CsvFileStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        if self.is_absent()? {
            info!(path = %self.path.display(), "creating empty expense file");
            self.save(&[])?;
        } else {
            debug!(path = %self.path.display(), "expense file already present");
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        if self.is_absent()? {
            debug!(path = %self.path.display(), "no expense file yet, treating as empty");
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = strip_bom(reader.headers()?);
        reader.set_headers(headers.clone());
        if headers.iter().ne(EXPENSE_COLUMNS.iter().copied()) {
            return Err(StoreError::UnexpectedHeader {
                found: headers.iter().map(str::to_string).collect(),
            });
        }

        let mut records = Vec::new();
        for result in reader.deserialize::<ExpenseRecord>() {
            let record = result.map_err(|source| {
                if source.is_io_error() {
                    return StoreError::Csv(source);
                }
                let line = source
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(records.len() as u64 + 2);
                StoreError::MalformedRow { line, source }
            })?;
            records.push(record);
        }

        debug!(path = %self.path.display(), count = records.len(), "loaded expenses");
        Ok(records)
    }

    fn save(&mut self, records: &[ExpenseRecord]) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        // Written explicitly so an empty collection still carries the schema.
        writer.write_record(EXPENSE_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), count = records.len(), "saved expenses");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Drop a UTF-8 byte order mark from the first header field. Spreadsheet
/// exports often start the file with one.
fn strip_bom(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, field)| if i == 0 { field.trim_start_matches('\u{feff}') } else { field })
        .collect()
}
