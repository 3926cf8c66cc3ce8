use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{aggregate_by_category, ExpenseRecord};
use crate::storage::{CsvFileStore, ExpenseStore, MemoryStore};

use super::{AppError, SpendingReport};

/// The expense ledger. This is the primary interface for any client (CLI,
/// shell session, tests); it is the only thing that talks to the store.
///
/// The ledger does not validate what it is given: a non-empty category and a
/// positive amount are the caller's responsibility.
pub struct Ledger {
    store: Box<dyn ExpenseStore>,
}

impl Ledger {
    /// Create a ledger over the given store.
    pub fn new(store: Box<dyn ExpenseStore>) -> Self {
        Self { store }
    }

    /// Ledger backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Ledger backed by a CSV file, initialized so the file exists.
    pub fn open_csv(path: impl Into<std::path::PathBuf>) -> Result<Self, AppError> {
        let mut ledger = Self::new(Box::new(CsvFileStore::new(path)));
        ledger.initialize()?;
        Ok(ledger)
    }

    /// Where the records live.
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Make sure the backing store exists. Safe to call repeatedly.
    pub fn initialize(&mut self) -> Result<(), AppError> {
        self.store.initialize()?;
        debug!(location = %self.store.location(), "ledger initialized");
        Ok(())
    }

    /// Append a record and persist the whole collection.
    ///
    /// Not atomic: the collection is re-read, extended and rewritten.
    pub fn add(&mut self, record: ExpenseRecord) -> Result<(), AppError> {
        let mut records = self.store.load()?;
        info!(
            date = %record.date,
            category = %record.category,
            amount = %record.amount,
            "adding expense"
        );
        records.push(record);
        self.store.save(&records)?;
        Ok(())
    }

    /// Convenience over [`Ledger::add`] building the record from its parts.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        description: Option<String>,
    ) -> Result<ExpenseRecord, AppError> {
        let record = ExpenseRecord::new(date, category, amount, description);
        self.add(record.clone())?;
        Ok(record)
    }

    /// Every record, in insertion order.
    pub fn list_all(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(self.store.load()?)
    }

    /// Records whose category equals `name`, ignoring case.
    pub fn filter_by_category(&self, name: &str) -> Result<Vec<ExpenseRecord>, AppError> {
        let matches: Vec<ExpenseRecord> = self
            .store
            .load()?
            .into_iter()
            .filter(|record| record.matches_category(name))
            .collect();
        debug!(category = name, count = matches.len(), "filtered expenses");
        Ok(matches)
    }

    /// Drop every record, keeping the empty schema-only collection.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        self.store.save(&[])?;
        info!(location = %self.store.location(), "cleared all expenses");
        Ok(())
    }

    /// Total amount per normalized category. Records with a non-numeric
    /// amount are left out.
    pub fn summarize_by_category(&self) -> Result<BTreeMap<String, f64>, AppError> {
        let records = self.store.load()?;
        Ok(aggregate_by_category(&records).totals())
    }

    /// Category summary with counts and shares, ready for display.
    pub fn spending_report(&self) -> Result<SpendingReport, AppError> {
        let records = self.store.load()?;
        Ok(SpendingReport::from_breakdown(&aggregate_by_category(
            &records,
        )))
    }
}
