// handlers/public/submit.rs - POST /api/submit handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::services::submission::{submit, SelectionRequest};

/// Store a client's photo selection and notify the photographer
pub async fn submit_post(
    State(state): State<AppState>,
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(payload)?;
    submit(state.store.as_ref(), state.notifier.as_ref(), request).await?;
    Ok(ApiResponse::message("Selections submitted and processed successfully!"))
}
