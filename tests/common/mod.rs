// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use spendlog::{ExpenseRecord, Ledger};
use tempfile::TempDir;

/// Helper to create a CSV-backed ledger in a temporary directory
pub fn csv_ledger() -> Result<(Ledger, PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("expense_tracker.csv");
    let ledger = Ledger::open_csv(&path)?;
    Ok((ledger, path, temp_dir))
}

/// Helper to create an initialized in-memory ledger
pub fn memory_ledger() -> Result<Ledger> {
    let mut ledger = Ledger::in_memory();
    ledger.initialize()?;
    Ok(ledger)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build a record with a raw amount, bypassing numeric formatting
pub fn raw_record(date: &str, category: &str, amount: &str, description: &str) -> ExpenseRecord {
    ExpenseRecord {
        date: parse_date(date),
        category: category.to_string(),
        amount: amount.to_string(),
        description: if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        },
    }
}

/// Test fixture: a small month of expenses
pub struct SampleExpenses;

impl SampleExpenses {
    pub fn add_month(ledger: &mut Ledger) -> Result<()> {
        ledger.add_expense(parse_date("2024-01-01"), "Rent", 800.0, Some("January".into()))?;
        ledger.add_expense(parse_date("2024-01-03"), "Food", 42.5, Some("groceries".into()))?;
        ledger.add_expense(parse_date("2024-01-05"), "transport", 2.8, None)?;
        ledger.add_expense(parse_date("2024-01-09"), "food", 18.0, Some("pizza".into()))?;
        ledger.add_expense(parse_date("2024-01-12"), "FOOD", 7.25, None)?;
        Ok(())
    }
}
