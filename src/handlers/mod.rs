// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (client JWT) → Elevated (admin JWT)
pub mod public;    // Tier 1: login, selection submit
pub mod protected; // Tier 2: client gallery browsing (/api/my-gallery)
pub mod elevated;  // Tier 3: admin dashboard API

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into the usual `{message}` 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request("Request body must be valid JSON.")
    })
}

/// Lenient numeric query parsing: absent, non-numeric or zero falls back to the default
pub(crate) fn query_number(raw: &Option<String>) -> Option<u64> {
    raw.as_deref().and_then(|s| s.trim().parse::<u64>().ok()).filter(|n| *n > 0)
}
