//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, CurrentUser};
use tally_core::analysis::{AggregateSnapshot, DashboardStats};

/// GET /api/dashboard - Headline spending statistics
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DashboardStats>, AppError> {
    let records = state.db.expense_records(current.user.id)?;
    let today = chrono::Local::now().date_naive();

    let stats = AggregateSnapshot::from_records(&records, today)
        .map(|snapshot| DashboardStats::from_snapshot(&snapshot))
        .unwrap_or_else(DashboardStats::empty);

    Ok(Json(stats))
}
