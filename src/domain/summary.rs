use std::collections::BTreeMap;

use tracing::warn;

use super::{normalize_category, ExpenseRecord};

/// Running total and record count for one normalized category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryAggregate {
    pub total: f64,
    pub count: usize,
}

/// Per-category aggregation of a record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    /// Keyed by normalized category name.
    pub categories: BTreeMap<String, CategoryAggregate>,
    /// Records left out because their amount is not numeric.
    pub skipped: usize,
}

impl CategoryBreakdown {
    pub fn totals(&self) -> BTreeMap<String, f64> {
        self.categories
            .iter()
            .map(|(name, aggregate)| (name.clone(), aggregate.total))
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.categories.values().map(|a| a.total).sum()
    }
}

/// Group records by normalized category and sum their amounts.
/// Records whose amount does not parse are skipped, never fatal.
pub fn aggregate_by_category(records: &[ExpenseRecord]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();

    for record in records {
        let Some(amount) = record.amount_value() else {
            warn!(
                date = %record.date,
                category = %record.category,
                amount = %record.amount,
                "skipping record with non-numeric amount"
            );
            breakdown.skipped += 1;
            continue;
        };

        let entry = breakdown
            .categories
            .entry(normalize_category(&record.category))
            .or_default();
        entry.total += amount;
        entry.count += 1;
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, category: &str, amount: &str) -> ExpenseRecord {
        ExpenseRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: category.to_string(),
            amount: amount.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_aggregate_normalizes_and_skips() {
        let records = vec![
            record("2024-01-01", "Food", "10"),
            record("2024-01-02", "food", "5"),
            record("2024-01-03", " Food ", "x-not-a-number"),
        ];

        let breakdown = aggregate_by_category(&records);

        assert_eq!(breakdown.skipped, 1);
        assert_eq!(breakdown.categories.len(), 1);
        let food = breakdown.categories["Food"];
        assert_eq!(food.total, 15.0);
        assert_eq!(food.count, 2);
    }

    #[test]
    fn test_aggregate_multiple_categories() {
        let records = vec![
            record("2024-01-01", "rent", "800"),
            record("2024-01-02", "Transport", "2.50"),
            record("2024-01-03", "RENT", "50"),
        ];

        let breakdown = aggregate_by_category(&records);
        let totals = breakdown.totals();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Rent"], 850.0);
        assert_eq!(totals["Transport"], 2.5);
        assert_eq!(breakdown.grand_total(), 852.5);
    }

    #[test]
    fn test_aggregate_empty() {
        let breakdown = aggregate_by_category(&[]);
        assert!(breakdown.categories.is_empty());
        assert_eq!(breakdown.skipped, 0);
        assert_eq!(breakdown.grand_total(), 0.0);
    }
}
