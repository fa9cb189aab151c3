//! Summarizer: renders an [`AggregateSnapshot`] as the fixed-format text block
//! and parses that block back into [`SummaryFacts`].
//!
//! The text is both the payload sent to an external model and the only input
//! channel into the narrative engine, so both paths see the same information.

use std::sync::OnceLock;

use regex::Regex;

use super::aggregate::AggregateSnapshot;
use super::format::{format_currency, format_number, parse_number};

/// Category name as it appears on a breakdown line
///
/// Control characters become spaces so a name can never spill onto a line
/// of its own.
fn category_label(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Render the summary block
///
/// ```text
/// Total Expenses: ₹12,000.00
/// Number of Transactions: 3
///
/// Category Breakdown:
/// - Food: ₹5,400.00 (45.0%)
///
/// Recent Expenses (Last 30 days): 2 transactions
/// ```
pub fn render_summary(snapshot: &AggregateSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total Expenses: {}\n",
        format_currency(snapshot.total_amount, 2)
    ));
    out.push_str(&format!(
        "Number of Transactions: {}\n\n",
        snapshot.transaction_count
    ));
    out.push_str("Category Breakdown:\n");

    for entry in &snapshot.category_totals {
        out.push_str(&format!(
            "- {}: {} ({}%)\n",
            category_label(&entry.category),
            format_currency(entry.amount, 2),
            format_number(snapshot.percentage_of(entry.amount), 1)
        ));
    }

    out.push_str(&format!(
        "\nRecent Expenses (Last 30 days): {} transactions\n",
        snapshot.recent_count
    ));
    out
}

/// One category line recovered from a summary block
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub amount: f64,
    pub percentage: f64,
}

/// The values the narrative engine works from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryFacts {
    pub total: f64,
    /// In summary order (descending amount)
    pub categories: Vec<CategoryShare>,
}

fn total_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Total Expenses: ₹([\d,]+(?:\.\d+)?)").expect("valid regex")
    })
}

fn category_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^- (.+): ₹([\d,]+(?:\.\d+)?) \(([\d.]+)%\)$").expect("valid regex")
    })
}

impl SummaryFacts {
    /// Recover facts from a rendered summary block
    ///
    /// Missing or unreadable fields degrade to zero / no categories rather
    /// than failing.
    pub fn parse(summary: &str) -> Self {
        let total = total_pattern()
            .captures(summary)
            .and_then(|c| parse_number(&c[1]))
            .unwrap_or(0.0);

        let categories = category_pattern()
            .captures_iter(summary)
            .filter_map(|c| {
                Some(CategoryShare {
                    name: c[1].to_string(),
                    amount: parse_number(&c[2])?,
                    percentage: parse_number(&c[3])?,
                })
            })
            .collect();

        Self { total, categories }
    }

    /// Build the same facts directly, skipping the text round-trip
    ///
    /// Values are rounded exactly as the rendered block rounds them, so the
    /// result equals `SummaryFacts::parse(&render_summary(snapshot))`.
    pub fn from_snapshot(snapshot: &AggregateSnapshot) -> Self {
        let total = parse_number(&format_number(snapshot.total_amount, 2)).unwrap_or(0.0);
        let categories = snapshot
            .category_totals
            .iter()
            .map(|entry| CategoryShare {
                name: category_label(&entry.category),
                amount: parse_number(&format_number(entry.amount, 2)).unwrap_or(0.0),
                percentage: parse_number(&format_number(
                    snapshot.percentage_of(entry.amount),
                    1,
                ))
                .unwrap_or(0.0),
            })
            .collect();

        Self { total, categories }
    }

    /// First category holding the largest percentage
    pub fn top_category(&self) -> Option<&CategoryShare> {
        self.categories.iter().fold(None, |best, c| match best {
            Some(b) if b.percentage >= c.percentage => Some(b),
            _ => Some(c),
        })
    }
}
