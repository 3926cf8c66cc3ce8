use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column names of the persisted table, in order.
pub const EXPENSE_COLUMNS: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// A single expense entry.
///
/// The amount is kept as the text it was stored with. Records written through
/// [`ExpenseRecord::new`] always hold a well-formed number, but a hand-edited
/// file may not, and such rows must still load. Numeric coercion happens when
/// summarizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        description: Option<String>,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            amount: format_amount(amount),
            description: description.filter(|d| !d.is_empty()),
        }
    }

    /// Numeric value of the stored amount, if it parses.
    pub fn amount_value(&self) -> Option<f64> {
        parse_amount(&self.amount)
    }

    /// Amount as shown to the user: two decimals when numeric, raw text otherwise.
    pub fn display_amount(&self) -> String {
        match self.amount_value() {
            Some(value) => format_amount(value),
            None => self.amount.clone(),
        }
    }

    /// Case-insensitive category equality, without trimming.
    pub fn matches_category(&self, name: &str) -> bool {
        self.category.to_lowercase() == name.to_lowercase()
    }
}

/// Format an amount with two decimals.
/// Example: 12.5 -> "12.50"
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Lenient numeric coercion: surrounding whitespace is ignored, anything that
/// is not a finite number yields `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Normalize a category for grouping: trim, then upper-case the first
/// character and lower-case the rest.
/// Example: "  gROCERIES " -> "Groceries"
pub fn normalize_category(category: &str) -> String {
    let mut chars = category.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Rejected user input for a new expense.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Category must not be empty")]
    EmptyCategory,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Round to whole cents, the precision amounts are stored with.
/// Example: 12.344 -> 12.34
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Validate user input for an amount before it is handed to the ledger.
///
/// The check runs on the value as it will be stored, so anything that rounds
/// to zero cents is rejected.
pub fn parse_positive_amount(input: &str) -> Result<f64, InputError> {
    let value = parse_amount(input).ok_or_else(|| {
        InputError::InvalidAmount(format!("'{}' is not a number", input.trim()))
    })?;
    let rounded = round_to_cents(value);
    if !rounded.is_finite() {
        return Err(InputError::InvalidAmount(format!(
            "'{}' is too large",
            input.trim()
        )));
    }
    if rounded <= 0.0 {
        return Err(InputError::InvalidAmount(
            "Amount must be at least 0.01".to_string(),
        ));
    }
    Ok(rounded)
}

/// Validate user input for a category before it is handed to the ledger.
pub fn validate_category(input: &str) -> Result<String, InputError> {
    let category = input.trim();
    if category.is_empty() {
        return Err(InputError::EmptyCategory);
    }
    Ok(category.to_string())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(input.to_string()))
}
