use crate::domain::ExpenseRecord;

use super::{ExpenseStore, StoreError};

/// Volatile store: records live exactly as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ExpenseRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }
}

impl ExpenseStore for MemoryStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        // The collection exists from construction on.
        Ok(())
    }

    fn load(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[ExpenseRecord]) -> Result<(), StoreError> {
        self.records = records.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "in-memory session".to_string()
    }
}
