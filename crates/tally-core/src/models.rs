//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A stored expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// The slice of this expense the analysis pipeline looks at
    pub fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord {
            category: self.category.clone(),
            amount: self.amount,
            date: self.date,
            description: self.description.clone(),
        }
    }
}

/// Largest amount a single expense may carry
pub const MAX_EXPENSE_AMOUNT: f64 = 100_000_000.0;

/// Input for recording a new expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewExpense {
    /// Reject the shapes the aggregator assumes never reach it
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.category.trim().is_empty() {
            return Err("Category is required".to_string());
        }
        // Category names are written one per line into the summary block
        if self.category.chars().any(char::is_control) {
            return Err("Category must not contain control characters".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("Amount must be a positive number".to_string());
        }
        if self.amount > MAX_EXPENSE_AMOUNT {
            return Err("Amount must not exceed ₹100,000,000".to_string());
        }
        Ok(())
    }
}

/// One expense as seen by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExpenseRecord {
    pub fn new(category: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            category: category.into(),
            amount,
            date,
            description: None,
        }
    }
}

/// Which flavour of analysis the caller asked for
///
/// Only tunes the preamble sent to an external model; the deterministic
/// narrative is the same for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Analysis,
    Advice,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Advice => "advice",
        }
    }

    /// Parse a `type` query value; anything unrecognised means `analysis`
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("advice") => Self::Advice,
            _ => Self::Analysis,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The analysis contract returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResponse {
    pub success: bool,
    pub response: String,
    /// True when the text came from the deterministic engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock: Option<bool>,
    /// Why the external model was bypassed, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl NarrativeResponse {
    /// Text produced by the rule-based engine
    pub fn mock(response: String) -> Self {
        Self {
            success: true,
            response,
            mock: Some(true),
            debug: None,
        }
    }

    /// Text produced by an external model
    pub fn generated(response: String) -> Self {
        Self {
            success: true,
            response,
            mock: None,
            debug: None,
        }
    }

    /// Informational reply that involves no analysis at all
    pub fn informational(response: &str) -> Self {
        Self {
            success: true,
            response: response.to_string(),
            mock: None,
            debug: None,
        }
    }

    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = Some(debug.into());
        self
    }

    pub fn is_mock(&self) -> bool {
        self.mock.unwrap_or(false)
    }
}
