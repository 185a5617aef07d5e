// handlers/public/auth/client_login.rs - POST /api/auth/client-login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::LoginRequest;
use crate::app::AppState;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::session::{client_login, ClientSession};

/**
 * POST /api/auth/client-login - Authenticate a client
 *
 * The outcome depends on how many galleries the client holds:
 * - none: 403 "You have not been assigned to any galleries yet."
 * - one:  { action: "redirect", destination: "/gallery/<slug>", token, clientName }
 * - more: { action: "select", galleries: [{ name, slug }], token, clientName }
 */
pub async fn client_login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ClientSession> {
    let request = json_body(payload)?;
    let session = client_login(state.store.as_ref(), &state.config.security, &request.username, &request.password).await?;
    Ok(ApiResponse::success(session))
}
