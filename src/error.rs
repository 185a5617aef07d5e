//! The portal's HTTP error: every failure leaves as `{error, message, code}`.
//!
//! Service errors convert through `From`, so handlers stay on `?`. Store,
//! token and Drive failures are logged here and answered with a fixed message.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::auth::JwtError;
use crate::database::StoreError;
use crate::services::admin::AdminError;
use crate::services::drive::DriveError;
use crate::services::gallery_access::AccessError;
use crate::services::session::SessionError;
use crate::services::submission::SubmitError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed ids, bodies, folder links, empty selections
    #[error("{0}")]
    BadRequest(String),

    /// Submission contact fields, keyed by form field
    #[error("{message}")]
    InvalidContact {
        message: String,
        fields: HashMap<String, String>,
    },

    #[error("{0}")]
    Unauthorized(String),

    /// Client with no gallery assignment
    #[error("{0}")]
    NoGalleryAccess(String),

    /// Absent record, or a gallery the client may not see
    #[error("{0}")]
    NotFound(String),

    /// Username or gallery slug already taken
    #[error("{0}")]
    Taken(String),

    #[error("{0}")]
    StoreUnavailable(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidContact { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NoGalleryAccess(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Taken(_) => StatusCode::CONFLICT,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidContact { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NoGalleryAccess(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Taken(_) => "CONFLICT",
            ApiError::StoreUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn body(&self) -> Value {
        let mut body = json!({
            "error": true,
            "message": self.to_string(),
            "code": self.code(),
        });
        if let ApiError::InvalidContact { fields, .. } = self {
            body["fieldErrors"] = json!(fields);
        }
        body
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => ApiError::Taken(msg),
            StoreError::ConfigMissing(what) => {
                tracing::error!("Store misconfigured: missing {}", what);
                ApiError::StoreUnavailable("Database temporarily unavailable")
            }
            StoreError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::Internal("Database error occurred")
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::error!("Token error: {}", err);
        ApiError::Internal("An internal server error occurred.")
    }
}

impl From<DriveError> for ApiError {
    fn from(err: DriveError) -> Self {
        tracing::error!("File listing error: {}", err);
        ApiError::Internal("Failed to fetch photos.")
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidAdminCredentials | SessionError::InvalidClientCredentials => {
                ApiError::Unauthorized(err.to_string())
            }
            SessionError::NotAssigned => ApiError::NoGalleryAccess(err.to_string()),
            SessionError::AssignedGalleryMissing => ApiError::NotFound(err.to_string()),
            SessionError::Store(e) => e.into(),
            SessionError::Token(e) => e.into(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => ApiError::NotFound(err.to_string()),
            AccessError::Store(e) => e.into(),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::NoSelection => ApiError::BadRequest(err.to_string()),
            SubmitError::InvalidContact(fields) => ApiError::InvalidContact {
                message: "Please check your contact details.".to_string(),
                fields,
            },
            SubmitError::Store(e) => {
                tracing::error!("Submission error: {}", e);
                ApiError::Internal("Failed to process submission.")
            }
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Invalid(msg) => ApiError::BadRequest(msg),
            AdminError::NotFound(msg) => ApiError::NotFound(msg.to_string()),
            AdminError::Store(e) => e.into(),
            AdminError::Hash(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self.body())).into_response()
    }
}
