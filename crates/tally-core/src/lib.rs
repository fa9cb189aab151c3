//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Database access and migrations (users, sessions, expenses)
//! - Analysis pipeline: aggregation, summary text, rule-based narrative
//! - Pluggable external model backends (Gemini, OpenAI-compatible)
//! - Analysis service with bounded provider calls and deterministic fallback

pub mod ai;
pub mod analysis;
pub mod analyst;
pub mod db;
pub mod error;
pub mod models;
pub mod prompts;

/// Test utilities including a mock model provider
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, GeminiBackend, MockBackend, OpenAICompatibleBackend};
pub use analysis::{
    render_summary, AggregateSnapshot, DashboardStats, NarrativeEngine, SummaryFacts,
    NO_EXPENSES_MESSAGE,
};
pub use analyst::ExpenseAnalyst;
pub use db::Database;
pub use error::{Error, Result};
pub use models::{AnalysisMode, Expense, ExpenseRecord, NarrativeResponse, NewExpense, User};
