mod csv_file;
mod error;
mod memory;

pub use csv_file::*;
pub use error::*;
pub use memory::*;

use std::path::Path;
use std::str::FromStr;

use crate::domain::ExpenseRecord;

/// Default file name for the CSV-backed store.
pub const DEFAULT_EXPENSE_FILE: &str = "expense_tracker.csv";

/// Persistence strategy for the expense collection.
///
/// Every operation reads or writes the whole collection; there is no
/// per-record access.
pub trait ExpenseStore {
    /// Create the empty, schema-only collection if none exists yet.
    /// Existing data is never touched.
    fn initialize(&mut self) -> Result<(), StoreError>;

    /// Read every record, in stored order.
    fn load(&self) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// Replace the stored collection with `records`.
    fn save(&mut self, records: &[ExpenseRecord]) -> Result<(), StoreError>;

    /// Human-readable location, for messages and logs.
    fn location(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Csv,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Csv => "csv",
            StoreKind::Memory => "memory",
        }
    }

    /// Build a store of this kind. `path` is only used by the CSV store.
    pub fn open(&self, path: &Path) -> Box<dyn ExpenseStore> {
        match self {
            StoreKind::Csv => Box::new(CsvFileStore::new(path)),
            StoreKind::Memory => Box::new(MemoryStore::new()),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "file" => Ok(StoreKind::Csv),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(format!(
                "unknown store '{}', expected 'csv' or 'memory'",
                other
            )),
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_kind_parse() {
        assert_eq!("csv".parse::<StoreKind>(), Ok(StoreKind::Csv));
        assert_eq!("MEMORY".parse::<StoreKind>(), Ok(StoreKind::Memory));
        assert!("sqlite".parse::<StoreKind>().is_err());
    }

    #[test]
    fn test_store_kind_display_round_trip() {
        for kind in [StoreKind::Csv, StoreKind::Memory] {
            assert_eq!(kind.to_string().parse::<StoreKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_memory_store_save_replaces() {
        let mut store = MemoryStore::new();
        store.initialize().unwrap();
        assert!(store.load().unwrap().is_empty());

        let record = ExpenseRecord::new(
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "Books",
            20.0,
            None,
        );
        store.save(&[record.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![record]);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
