//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod expenses;

// Re-export all handlers for use in router
pub use analysis::*;
pub use auth::*;
pub use dashboard::*;
pub use expenses::*;

use serde::de::DeserializeOwned;

use crate::{AppError, MAX_BODY_SIZE};

/// Decode a JSON request body, answering 400 on anything malformed
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    if body.len() > MAX_BODY_SIZE {
        return Err(AppError::bad_request("Request body too large"));
    }
    serde_json::from_slice(body).map_err(|_| AppError::bad_request("Invalid JSON"))
}
