// handlers/elevated/admin/submissions.rs - GET /api/submissions/:email handler

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::Submission;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::admin;

/// Full selection history for one contact, newest first, as a bare array
pub async fn submissions_get(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Vec<Submission>> {
    Ok(ApiResponse::success(admin::submission_history(state.store.as_ref(), &email).await?))
}
