//! Dashboard statistics derived from an aggregate snapshot

use serde::Serialize;

use super::aggregate::{AggregateSnapshot, CategoryTotal};

/// Per-category row for the dashboard table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub amount: f64,
    /// Share of total spend, in percent
    pub percentage: f64,
    /// Deviation from the average category spend, in percent
    pub vs_average: f64,
}

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_amount: f64,
    pub transaction_count: usize,
    pub recent_count: usize,
    pub category_count: usize,
    pub highest_category: Option<CategoryTotal>,
    pub lowest_category: Option<CategoryTotal>,
    pub average_per_category: f64,
    pub categories: Vec<CategoryStat>,
}

impl DashboardStats {
    /// Stats for a user with no expenses
    pub fn empty() -> Self {
        Self {
            total_amount: 0.0,
            transaction_count: 0,
            recent_count: 0,
            category_count: 0,
            highest_category: None,
            lowest_category: None,
            average_per_category: 0.0,
            categories: Vec::new(),
        }
    }

    pub fn from_snapshot(snapshot: &AggregateSnapshot) -> Self {
        let category_count = snapshot.category_count();
        if category_count == 0 {
            return Self::empty();
        }

        let average = snapshot.total_amount / category_count as f64;
        let categories = snapshot
            .category_totals
            .iter()
            .map(|c| CategoryStat {
                category: c.category.clone(),
                amount: c.amount,
                percentage: snapshot.percentage_of(c.amount),
                vs_average: if average == 0.0 {
                    0.0
                } else {
                    (c.amount - average) / average * 100.0
                },
            })
            .collect();

        Self {
            total_amount: snapshot.total_amount,
            transaction_count: snapshot.transaction_count,
            recent_count: snapshot.recent_count,
            category_count,
            highest_category: snapshot.category_totals.first().cloned(),
            lowest_category: snapshot.category_totals.last().cloned(),
            average_per_category: average,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_dashboard_from_snapshot() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let records = vec![
            ExpenseRecord::new("Food", 600.0, today),
            ExpenseRecord::new("Bills", 300.0, today),
            ExpenseRecord::new("Travel", 100.0, today),
            ExpenseRecord::new("Travel", 200.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        ];
        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        let stats = DashboardStats::from_snapshot(&snapshot);

        assert_eq!(stats.category_count, 3);
        assert_eq!(stats.transaction_count, 4);
        assert_eq!(stats.recent_count, 3);
        assert_eq!(stats.highest_category.as_ref().unwrap().category, "Food");
        // Bills and Travel tie at 300; Bills was seen first so Travel is last
        assert_eq!(stats.lowest_category.as_ref().unwrap().category, "Travel");
        assert!((stats.average_per_category - 400.0).abs() < 1e-9);
        assert!((stats.categories[0].vs_average - 50.0).abs() < 1e-9);
        assert!((stats.categories[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::empty();
        assert_eq!(stats.category_count, 0);
        assert!(stats.highest_category.is_none());
    }
}
