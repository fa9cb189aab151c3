//! Registration, login and session handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::parse_json;
use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use tally_core::models::User;

/// Request body for POST /api/register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for POST /api/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response carrying a user
#[derive(Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

/// POST /api/register - Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let req: RegisterRequest = parse_json(&body)?;

    let user = state
        .db
        .create_user(&req.username, &req.email, &req.password)
        .map_err(AppError::from_core)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            user,
        }),
    ))
}

/// POST /api/login - Exchange email and password for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LoginResponse>, AppError> {
    let req: LoginRequest = parse_json(&body)?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("Please fill in all fields"));
    }

    let user = state
        .db
        .authenticate(&req.email, &req.password)?
        .ok_or_else(|| AppError::with_status(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;

    let token = state.db.create_session(user.id)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

/// POST /api/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_session(&current.token)?;
    info!(user_id = current.user.id, "User logged out");
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/me - The authenticated user
pub async fn get_me(Extension(current): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: current.user,
    })
}
