//! Expense analysis service
//!
//! Runs the full pipeline for one request: aggregate, summarize, then either
//! ask the configured external model or compose the deterministic narrative.
//! Any external-model failure falls back to the narrative engine; callers
//! never see an upstream error.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::ai::{AIBackend, AIClient};
use crate::analysis::{render_summary, AggregateSnapshot, NarrativeEngine, NO_EXPENSES_MESSAGE};
use crate::error::{Error, Result};
use crate::models::{AnalysisMode, ExpenseRecord, NarrativeResponse};
use crate::prompts::build_prompt;

/// Environment variable for the external-model timeout
pub const AI_TIMEOUT_ENV: &str = "TALLY_AI_TIMEOUT_SECS";

/// Default bound on a single external-model call
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// Produces analysis replies for a user's expenses
#[derive(Clone)]
pub struct ExpenseAnalyst {
    ai: Option<AIClient>,
    timeout: Duration,
    engine: NarrativeEngine,
}

impl ExpenseAnalyst {
    /// Create an analyst; `None` means "no provider configured"
    pub fn new(ai: Option<AIClient>) -> Self {
        Self {
            ai,
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            engine: NarrativeEngine::new(),
        }
    }

    /// Analyst that only ever uses the deterministic engine
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Create from environment variables (`AI_BACKEND` etc. plus `TALLY_AI_TIMEOUT_SECS`)
    pub fn from_env() -> Self {
        let timeout = std::env::var(AI_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        Self::new(AIClient::from_env()).with_timeout(Duration::from_secs(timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Analyze `records` as of `today`
    pub async fn analyze(
        &self,
        records: &[ExpenseRecord],
        mode: AnalysisMode,
        today: NaiveDate,
    ) -> NarrativeResponse {
        let Some(snapshot) = AggregateSnapshot::from_records(records, today) else {
            return NarrativeResponse::informational(NO_EXPENSES_MESSAGE);
        };
        let summary = render_summary(&snapshot);

        debug!(
            transactions = snapshot.transaction_count,
            categories = snapshot.category_count(),
            mode = %mode,
            "Expense summary built"
        );

        let Some(client) = self.ai.as_ref() else {
            return self.engine.respond(&summary);
        };

        let prompt = build_prompt(mode, &summary);
        match self.ask_model(client, &prompt).await {
            Ok(text) => {
                info!(model = %client.model(), "Analysis generated by external model");
                NarrativeResponse::generated(text)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    model = %client.model(),
                    "External model unavailable, using rule-based analysis"
                );
                self.engine.respond(&summary).with_debug(e.to_string())
            }
        }
    }

    /// Analyze with the deterministic engine only, regardless of configuration
    pub fn analyze_offline(&self, records: &[ExpenseRecord], today: NaiveDate) -> NarrativeResponse {
        match AggregateSnapshot::from_records(records, today) {
            Some(snapshot) => self.engine.respond(&render_summary(&snapshot)),
            None => NarrativeResponse::informational(NO_EXPENSES_MESSAGE),
        }
    }

    /// One time-bounded call to the external model
    async fn ask_model(&self, client: &AIClient, prompt: &str) -> Result<String> {
        let text = tokio::time::timeout(self.timeout, client.generate(prompt))
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_secs()))??;

        if text.trim().is_empty() {
            return Err(Error::Upstream("Empty response from model".to_string()));
        }
        Ok(text)
    }
}
