//! Aggregator: reduces raw expense records into an [`AggregateSnapshot`]

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::ExpenseRecord;

/// Length of the trailing "recent" window, in calendar days
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Summed spend for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Point-in-time aggregate of a user's expenses
///
/// `category_totals` is ordered by descending amount; categories with equal
/// amounts keep the order in which they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub total_amount: f64,
    pub transaction_count: usize,
    pub recent_count: usize,
    pub category_totals: Vec<CategoryTotal>,
}

impl AggregateSnapshot {
    /// Aggregate `records` relative to `today`
    ///
    /// Returns `None` for an empty list so callers can short-circuit to the
    /// "no expenses yet" reply.
    pub fn from_records(records: &[ExpenseRecord], today: NaiveDate) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let window_start = today - Duration::days(RECENT_WINDOW_DAYS);

        let mut total_amount = 0.0;
        let mut recent_count = 0;
        let mut category_totals: Vec<CategoryTotal> = Vec::new();

        for record in records {
            total_amount += record.amount;

            match category_totals
                .iter_mut()
                .find(|c| c.category == record.category)
            {
                Some(entry) => entry.amount += record.amount,
                None => category_totals.push(CategoryTotal {
                    category: record.category.clone(),
                    amount: record.amount,
                }),
            }

            if record.date >= window_start {
                recent_count += 1;
            }
        }

        // sort_by is stable: equal amounts stay in first-seen order
        category_totals.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Some(Self {
            total_amount,
            transaction_count: records.len(),
            recent_count,
            category_totals,
        })
    }

    pub fn category_count(&self) -> usize {
        self.category_totals.len()
    }

    /// Share of the total for one category, in percent
    pub fn percentage_of(&self, amount: f64) -> f64 {
        if self.total_amount == 0.0 {
            0.0
        } else {
            amount / self.total_amount * 100.0
        }
    }

    /// The highest-spend category, if any
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.category_totals.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cents(v: f64) -> i64 {
        (v * 100.0).round() as i64
    }

    #[test]
    fn test_empty_records() {
        assert!(AggregateSnapshot::from_records(&[], day(2024, 6, 30)).is_none());
    }

    #[test]
    fn test_totals_and_ordering() {
        let today = day(2024, 6, 30);
        let records = vec![
            ExpenseRecord::new("Travel", 120.0, day(2024, 6, 1)),
            ExpenseRecord::new("Food", 80.25, day(2024, 6, 2)),
            ExpenseRecord::new("Food", 99.75, day(2024, 6, 3)),
            ExpenseRecord::new("Bills", 40.0, day(2024, 6, 4)),
        ];

        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        assert_eq!(snapshot.transaction_count, 4);
        assert_eq!(snapshot.category_count(), 3);
        assert_eq!(cents(snapshot.total_amount), 34000);

        let names: Vec<&str> = snapshot
            .category_totals
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Travel", "Bills"]);
        assert_eq!(snapshot.top_category().unwrap().category, "Food");
    }

    #[test]
    fn test_category_sum_matches_total() {
        let today = day(2024, 6, 30);
        let amounts = [0.1, 0.2, 19.99, 1234.56, 7.07, 0.3, 88.8, 15.15, 2.02];
        let categories = ["Food", "Travel", "Food", "Bills", "Other", "Food", "Travel"];
        let records: Vec<ExpenseRecord> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| {
                ExpenseRecord::new(categories[i % categories.len()], *a, day(2024, 6, 1))
            })
            .collect();

        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        let category_sum: f64 = snapshot.category_totals.iter().map(|c| c.amount).sum();
        assert_eq!(cents(category_sum), cents(snapshot.total_amount));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let today = day(2024, 6, 30);
        let records = vec![
            ExpenseRecord::new("Zoo", 50.0, day(2024, 6, 1)),
            ExpenseRecord::new("Books", 75.0, day(2024, 6, 1)),
            ExpenseRecord::new("Art", 50.0, day(2024, 6, 1)),
            ExpenseRecord::new("Bikes", 50.0, day(2024, 6, 1)),
        ];

        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        let names: Vec<&str> = snapshot
            .category_totals
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Books", "Zoo", "Art", "Bikes"]);
    }

    #[test]
    fn test_category_keys_are_exact() {
        let today = day(2024, 6, 30);
        let records = vec![
            ExpenseRecord::new("food", 10.0, day(2024, 6, 1)),
            ExpenseRecord::new("Food", 10.0, day(2024, 6, 1)),
        ];
        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        assert_eq!(snapshot.category_count(), 2);
    }

    #[test]
    fn test_recent_window_is_inclusive() {
        let today = day(2024, 6, 30);
        let records = vec![
            ExpenseRecord::new("Food", 1.0, day(2024, 6, 30)),
            // exactly 30 days back
            ExpenseRecord::new("Food", 1.0, day(2024, 5, 31)),
            // 31 days back
            ExpenseRecord::new("Food", 1.0, day(2024, 5, 30)),
            ExpenseRecord::new("Food", 1.0, day(2023, 1, 1)),
        ];

        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        assert_eq!(snapshot.recent_count, 2);
        assert_eq!(snapshot.transaction_count, 4);
    }

    #[test]
    fn test_percentage_of() {
        let today = day(2024, 6, 30);
        let records = vec![
            ExpenseRecord::new("Food", 45.0, day(2024, 6, 1)),
            ExpenseRecord::new("Rent", 55.0, day(2024, 6, 1)),
        ];
        let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
        assert!((snapshot.percentage_of(45.0) - 45.0).abs() < 1e-9);
    }
}
