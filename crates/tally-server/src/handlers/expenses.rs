//! Expense handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::parse_json;
use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use tally_core::models::{Expense, NewExpense};

/// GET /api/expenses - The caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.db.list_expenses(current.user.id)?;
    Ok(Json(expenses))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let req: NewExpense = parse_json(&body)?;

    let id = state
        .db
        .insert_expense(current.user.id, &req)
        .map_err(AppError::from_core)?;

    let expense = state
        .db
        .get_expense(current.user.id, id)?
        .ok_or_else(|| AppError::internal("Expense not found after creation"))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// DELETE /api/expenses/:id - Delete one of the caller's expenses
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_expense(current.user.id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
