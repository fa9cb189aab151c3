//! Spending analysis handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser};
use tally_core::models::{AnalysisMode, NarrativeResponse};

/// Query parameters for GET /api/analysis
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// `advice` or `analysis`; anything else means `analysis`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/analysis?type= - Narrative analysis of the caller's spending
///
/// Always answers 200 once the expenses are loaded: provider problems fall
/// back to the rule-based narrative.
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<AnalysisQuery>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let mode = AnalysisMode::from_param(params.kind.as_deref());
    let records = state.db.expense_records(current.user.id)?;
    let today = chrono::Local::now().date_naive();

    let mut reply = state.analyst.analyze(&records, mode, today).await;
    if !state.config.expose_debug {
        reply.debug = None;
    }

    Ok(Json(reply))
}
