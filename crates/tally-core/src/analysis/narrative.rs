//! Narrative Engine: deterministic "AI-style" spending analysis
//!
//! Composes the reply from a parsed summary block using fixed thresholds and
//! a closed table of category tips. No randomness and no clock: identical
//! input always yields byte-identical output.

use super::format::{format_currency, format_number};
use super::summary::{CategoryShare, SummaryFacts};
use crate::models::NarrativeResponse;

/// Totals above this are framed as high spending
pub const HIGH_SPENDING_THRESHOLD: f64 = 10_000.0;

/// Top-category share (percent) above which the concentration alert fires
pub const CONCENTRATION_ALERT_PERCENT: f64 = 40.0;

/// Category counts at or below this get the "track more categories" note
pub const NARROW_TRACKING_MAX_CATEGORIES: usize = 2;

/// Suggested budget as a fraction of current spend (10% reduction goal)
pub const BUDGET_TARGET_FACTOR: f64 = 0.9;

const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Category-specific saving advice
///
/// Resolved by exact category name; anything not listed gets `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipPlan {
    Food,
    Shopping,
    Entertainment,
    General,
}

impl TipPlan {
    pub fn for_category(name: &str) -> Self {
        match name {
            "Food" => Self::Food,
            "Shopping" => Self::Shopping,
            "Entertainment" => Self::Entertainment,
            _ => Self::General,
        }
    }

    /// Reduction target in whole percent, for plans that quote a savings figure
    pub fn savings_percent(&self) -> Option<u32> {
        match self {
            Self::Food => Some(15),
            Self::Shopping => Some(20),
            Self::Entertainment => Some(25),
            Self::General => None,
        }
    }

    fn tips(&self) -> &'static [&'static str] {
        match self {
            Self::Food => &[
                "Plan meals in advance to reduce impulse dining",
                "Cook at home more often",
                "Limit restaurant visits to 2-3 times per week",
            ],
            Self::Shopping => &[
                "Create a shopping list before purchases",
                "Wait 24 hours before buying non-essentials",
                "Look for discounts and compare prices",
            ],
            Self::Entertainment => &[
                "Explore free entertainment options",
                "Set a monthly entertainment budget",
                "Share subscription costs with family",
            ],
            Self::General => &[],
        }
    }

    /// Render the tip block for `category` given the overall `total`
    pub fn render(&self, category: &str, total: f64) -> String {
        let Some(percent) = self.savings_percent() else {
            return format!(
                "💡 Recommendation: Review {} expenses and identify areas to cut back by 15-20%.",
                category
            );
        };

        let mut lines = vec!["💡 Saving Tips:".to_string()];
        lines.extend(self.tips().iter().map(|tip| format!("- {}", tip)));
        lines.push(format!(
            "- Potential savings: {} per month ({}% reduction)",
            format_currency(total * f64::from(percent) / 100.0, 0),
            percent
        ));
        lines.join("\n")
    }
}

/// Rule-based composer of the analysis text
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeEngine;

impl NarrativeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse a summary block and compose the reply envelope
    pub fn respond(&self, summary: &str) -> NarrativeResponse {
        NarrativeResponse::mock(self.compose(&SummaryFacts::parse(summary)))
    }

    /// Compose the narrative text from parsed facts
    pub fn compose(&self, facts: &SummaryFacts) -> String {
        let mut fragments = vec![headline(facts.total)];

        if let Some(top) = facts.top_category() {
            fragments.push(format!(
                "📊 Key Insight: Your highest spending category is {} at {}% of total expenses.",
                top.name,
                format_number(top.percentage, 1)
            ));

            if top.percentage > CONCENTRATION_ALERT_PERCENT {
                fragments.push(concentration_alert(top, facts.total));
            }
        }

        // An empty breakdown skips the note along with the other category fragments
        let count = facts.categories.len();
        if count > 0 && count <= NARROW_TRACKING_MAX_CATEGORIES {
            fragments.push(format!(
                "📝 Note: You're tracking only {} categories. Consider breaking down expenses further for better insights.",
                count
            ));
        }

        fragments.push(closing_checklist(facts.total));
        fragments.join(FRAGMENT_SEPARATOR)
    }
}

fn headline(total: f64) -> String {
    if total > HIGH_SPENDING_THRESHOLD {
        format!(
            "Your total spending of {} is on the higher side. Let's look at optimization opportunities.",
            format_currency(total, 2)
        )
    } else {
        format!(
            "Your total spending of {} shows moderate financial activity.",
            format_currency(total, 2)
        )
    }
}

fn concentration_alert(top: &CategoryShare, total: f64) -> String {
    format!(
        "⚠️ Alert: {} consumes a significant portion of your budget. Consider reviewing these expenses.\n{}",
        top.name,
        TipPlan::for_category(&top.name).render(&top.name, total)
    )
}

fn closing_checklist(total: f64) -> String {
    [
        "✅ Recommendations:".to_string(),
        format!(
            "1. Set a monthly budget limit of {} (10% reduction goal)",
            format_currency(total * BUDGET_TARGET_FACTOR, 0)
        ),
        "2. Track all expenses daily for better awareness".to_string(),
        "3. Build an emergency fund covering 3-6 months of expenses".to_string(),
        "4. Review and optimize expenses weekly".to_string(),
    ]
    .join("\n")
}
