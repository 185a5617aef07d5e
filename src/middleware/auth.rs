use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{validate_jwt, Identity};
use crate::error::ApiError;

/// Admin context extracted from JWT
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub username: String,
}

/// Client context extracted from JWT
#[derive(Clone, Debug)]
pub struct ClientUser {
    pub client_id: Uuid,
}

/// Rejects unless the bearer token decodes to an admin identity
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authenticate(&state, &headers) {
        Ok(Identity::Admin { username }) => {
            request.extensions_mut().insert(AdminUser { username });
            Ok(next.run(request).await)
        }
        Ok(_) => {
            tracing::warn!("Client token presented to admin route {}", request.uri().path());
            Err(ApiError::unauthorized("Admin authentication failed."))
        }
        Err(reason) => {
            tracing::warn!("Admin auth failed on {}: {}", request.uri().path(), reason);
            Err(ApiError::unauthorized("Admin authentication failed."))
        }
    }
}

/// Rejects unless the bearer token decodes to a client identity
pub async fn client_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authenticate(&state, &headers) {
        Ok(Identity::Client { client_id }) => {
            request.extensions_mut().insert(ClientUser { client_id });
            Ok(next.run(request).await)
        }
        Ok(_) => {
            tracing::warn!("Admin token presented to client route {}", request.uri().path());
            Err(ApiError::unauthorized("Client authentication failed."))
        }
        Err(reason) => {
            tracing::warn!("Client auth failed on {}: {}", request.uri().path(), reason);
            Err(ApiError::unauthorized("Client authentication failed."))
        }
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, String> {
    let token = extract_jwt_from_headers(headers)?;
    let claims = validate_jwt(&token, &state.config.security).map_err(|e| e.to_string())?;
    claims.identity().ok_or_else(|| "Token carries no usable identity".to_string())
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
