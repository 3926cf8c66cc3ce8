use serde::Serialize;

use crate::domain::CategoryBreakdown;

#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
    /// Records left out for a non-numeric amount.
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

impl SpendingReport {
    /// Rows sorted by total, largest first; ties by category name.
    pub fn from_breakdown(breakdown: &CategoryBreakdown) -> Self {
        let total = breakdown.grand_total();

        let mut categories: Vec<CategoryTotal> = breakdown
            .categories
            .iter()
            .map(|(name, aggregate)| CategoryTotal {
                category: name.clone(),
                total: aggregate.total,
                count: aggregate.count,
                percentage: if total > 0.0 {
                    aggregate.total / total * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            categories,
            total,
            skipped: breakdown.skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Largest single category total, zero when empty.
    pub fn max_total(&self) -> f64 {
        self.categories
            .iter()
            .map(|c| c.total)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryAggregate;

    fn breakdown(entries: &[(&str, f64, usize)], skipped: usize) -> CategoryBreakdown {
        CategoryBreakdown {
            categories: entries
                .iter()
                .map(|(name, total, count)| {
                    (
                        name.to_string(),
                        CategoryAggregate {
                            total: *total,
                            count: *count,
                        },
                    )
                })
                .collect(),
            skipped,
        }
    }

    #[test]
    fn test_report_sorted_by_total_desc() {
        let report = SpendingReport::from_breakdown(&breakdown(
            &[("Books", 25.0, 1), ("Food", 75.0, 3), ("Apps", 25.0, 2)],
            2,
        ));

        let names: Vec<&str> = report
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Apps", "Books"]);
        assert_eq!(report.total, 125.0);
        assert_eq!(report.skipped, 2);
        assert!((report.categories[0].percentage - 60.0).abs() < 1e-9);
        assert_eq!(report.max_total(), 75.0);
    }

    #[test]
    fn test_empty_report() {
        let report = SpendingReport::from_breakdown(&CategoryBreakdown::default());
        assert!(report.is_empty());
        assert_eq!(report.total, 0.0);
        assert_eq!(report.max_total(), 0.0);
    }
}
