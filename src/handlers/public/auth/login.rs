// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::LoginRequest;
use crate::app::AppState;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::session::{admin_login, AdminSession};

/**
 * POST /api/auth/login - Authenticate an admin and receive a JWT
 *
 * Input:  { "username": "string", "password": "string" }
 * Output: { "message": "...", "token": "eyJ...", "username": "admin" }
 *
 * Bad credentials are a 401 "Invalid admin credentials." whether the
 * account exists or not.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AdminSession> {
    let request = json_body(payload)?;
    let session = admin_login(state.store.as_ref(), &state.config.security, &request.username, &request.password).await?;
    Ok(ApiResponse::success(session))
}
