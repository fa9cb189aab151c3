//! Prompt construction for the external-model path
//!
//! Both the external model and the deterministic engine consume the same
//! summary block; the prompt only adds a mode-specific preamble.

use crate::models::AnalysisMode;

const ADVICE_PREAMBLE: &str = "As a financial advisor, analyze this expense data and provide 3-4 actionable money-saving tips. Be concise (max 300 words).";

const ANALYSIS_PREAMBLE: &str = "As a financial analyst, provide a brief analysis of these expenses with key insights and 2-3 recommendations. Be concise (max 300 words).";

/// Instruction text for a mode
pub fn preamble(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Advice => ADVICE_PREAMBLE,
        AnalysisMode::Analysis => ANALYSIS_PREAMBLE,
    }
}

/// Full prompt: preamble, blank line, summary block
pub fn build_prompt(mode: AnalysisMode, summary: &str) -> String {
    format!("{}\n\n{}", preamble(mode), summary)
}
