use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Token payload. Exactly one of `username` (admin) or `client_id` (client) is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

/// Decoded identity attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Admin { username: String },
    Client { client_id: Uuid },
}

impl Claims {
    fn new(username: Option<String>, client_id: Option<Uuid>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            username,
            client_id,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn admin(username: impl Into<String>, expiry_hours: u64) -> Self {
        Self::new(Some(username.into()), None, expiry_hours)
    }

    pub fn client(client_id: Uuid, expiry_hours: u64) -> Self {
        Self::new(None, Some(client_id), expiry_hours)
    }

    pub fn identity(&self) -> Option<Identity> {
        match (&self.username, self.client_id) {
            (Some(username), None) => Some(Identity::Admin { username: username.clone() }),
            (None, Some(client_id)) => Some(Identity::Client { client_id }),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry, returning the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, JwtError> {
    bcrypt::hash(password, cost).map_err(|e| JwtError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, JwtError> {
    bcrypt::verify(password, hash).map_err(|e| JwtError::PasswordHash(e.to_string()))
}

/// bcrypt off the async runtime
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, JwtError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| JwtError::PasswordHash(e.to_string()))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, JwtError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| JwtError::PasswordHash(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn security() -> SecurityConfig {
        AppConfig::development().security
    }

    #[test]
    fn admin_token_round_trips_to_admin_identity() {
        let security = security();
        let token = generate_jwt(&Claims::admin("studio", 8), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.identity(), Some(Identity::Admin { username: "studio".into() }));
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn client_token_carries_client_id() {
        let security = security();
        let id = Uuid::new_v4();
        let token = generate_jwt(&Claims::client(id, 8), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.identity(), Some(Identity::Client { client_id: id }));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let security = security();
        let token = generate_jwt(&Claims::admin("studio", 8), &security).unwrap();
        let mut other = security.clone();
        other.jwt_secret = "another-secret".into();
        assert!(matches!(validate_jwt(&token, &other), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = security();
        let mut claims = Claims::admin("studio", 8);
        claims.exp = Utc::now().timestamp() - 3600;
        claims.iat = claims.exp - 60;
        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = security();
        security.jwt_secret.clear();
        assert!(matches!(generate_jwt(&Claims::admin("a", 1), &security), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn ambiguous_claims_have_no_identity() {
        let mut claims = Claims::admin("studio", 1);
        claims.client_id = Some(Uuid::new_v4());
        assert_eq!(claims.identity(), None);
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
