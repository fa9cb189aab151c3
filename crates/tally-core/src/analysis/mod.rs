//! Expense analysis pipeline
//!
//! records → [`AggregateSnapshot`] → summary text ([`render_summary`]) →
//! [`NarrativeEngine`] → [`NarrativeResponse`](crate::models::NarrativeResponse)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::analysis::{AggregateSnapshot, NarrativeEngine, render_summary};
//!
//! let snapshot = AggregateSnapshot::from_records(&records, today).unwrap();
//! let summary = render_summary(&snapshot);
//! let reply = NarrativeEngine::new().respond(&summary);
//! ```

pub mod aggregate;
pub mod dashboard;
pub mod format;
pub mod narrative;
pub mod summary;

pub use aggregate::{AggregateSnapshot, CategoryTotal, RECENT_WINDOW_DAYS};
pub use dashboard::{CategoryStat, DashboardStats};
pub use format::{format_currency, format_number, CURRENCY_SYMBOL};
pub use narrative::{NarrativeEngine, TipPlan};
pub use summary::{render_summary, CategoryShare, SummaryFacts};

/// Reply used when a user has no expenses on record
pub const NO_EXPENSES_MESSAGE: &str = "You haven't recorded any expenses yet. Start tracking your spending to get personalized AI insights!";
