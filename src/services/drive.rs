use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::DriveConfig;

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
/// Refresh cached access tokens this long before they expire
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// One image file in a gallery folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Drive credentials are not configured")]
    NotConfigured,
    #[error("Failed to read service account credentials: {0}")]
    Credentials(String),
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
    #[error("Drive API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Source of a folder's image listing. No paging upstream: one call returns everything (capped).
#[async_trait]
pub trait FileListingProvider: Send + Sync {
    /// Non-trashed image files directly inside `folder_id`, ordered by name
    async fn list_images(&self, folder_id: &str, cap: u32) -> Result<Vec<DriveFile>, DriveError>;
}

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

enum DriveAuth {
    None,
    ApiKey(String),
    ServiceAccount {
        key: ServiceAccountKey,
        token_uri: String,
        cached: Mutex<Option<CachedToken>>,
    },
}

/// Google Drive v3 `files.list` client
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
    auth: DriveAuth,
}

impl DriveClient {
    /// Prefers a service-account credentials file, then an API key
    pub fn from_config(config: &DriveConfig) -> Result<Self, DriveError> {
        let auth = if let Some(path) = &config.credentials_file {
            let raw = std::fs::read_to_string(path).map_err(|e| DriveError::Credentials(format!("{}: {}", path, e)))?;
            let key: ServiceAccountKey =
                serde_json::from_str(&raw).map_err(|e| DriveError::Credentials(e.to_string()))?;
            let token_uri = key.token_uri.clone().unwrap_or_else(|| config.token_uri.clone());
            DriveAuth::ServiceAccount {
                key,
                token_uri,
                cached: Mutex::new(None),
            }
        } else if let Some(api_key) = &config.api_key {
            DriveAuth::ApiKey(api_key.clone())
        } else {
            tracing::warn!("No Drive credentials configured; gallery listings will fail");
            DriveAuth::None
        };

        Ok(Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Drive search expression for a folder's live images
    pub fn folder_query(folder_id: &str) -> String {
        let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{}' in parents and mimeType contains 'image/' and trashed=false", escaped)
    }

    async fn access_token(&self) -> Result<Option<String>, DriveError> {
        let DriveAuth::ServiceAccount { key, token_uri, cached } = &self.auth else {
            return Ok(None);
        };

        let mut cached = cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(Some(token.token.clone()));
            }
        }

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: DRIVE_SCOPE,
            aud: token_uri,
            iat: now,
            exp: now + 3600,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DriveError::Credentials(e.to_string()))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| DriveError::Credentials(e.to_string()))?;

        let response = self
            .http
            .post(token_uri.as_str())
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenExchange(format!("{}: {}", status, body)));
        }
        let token: TokenResponse = response.json().await?;
        tracing::debug!("Obtained Drive access token valid for {}s", token.expires_in);

        *cached = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(Some(token.access_token))
    }
}

#[async_trait]
impl FileListingProvider for DriveClient {
    async fn list_images(&self, folder_id: &str, cap: u32) -> Result<Vec<DriveFile>, DriveError> {
        if matches!(self.auth, DriveAuth::None) {
            return Err(DriveError::NotConfigured);
        }

        let query = Self::folder_query(folder_id);
        let page_size = cap.to_string();
        let mut request = self.http.get(format!("{}/files", self.api_base)).query(&[
            ("q", query.as_str()),
            ("fields", "files(id, name)"),
            ("pageSize", page_size.as_str()),
            ("orderBy", "name"),
        ]);

        if let DriveAuth::ApiKey(key) = &self.auth {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Api { status, body });
        }

        let listing: FileListResponse = response.json().await?;
        tracing::debug!("Drive folder {} listed {} images", folder_id, listing.files.len());
        Ok(listing.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_query_filters_images_in_parent() {
        assert_eq!(
            DriveClient::folder_query("abc123"),
            "'abc123' in parents and mimeType contains 'image/' and trashed=false"
        );
        assert!(DriveClient::folder_query("a'b").starts_with("'a\\'b'"));
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_to_list() {
        let client = DriveClient::from_config(&DriveConfig::default()).unwrap();
        let err = client.list_images("folder", 1000).await.unwrap_err();
        assert!(matches!(err, DriveError::NotConfigured));
    }

    #[test]
    fn missing_credentials_file_is_reported() {
        let config = DriveConfig {
            credentials_file: Some("/nonexistent/credentials.json".into()),
            ..DriveConfig::default()
        };
        assert!(matches!(DriveClient::from_config(&config), Err(DriveError::Credentials(_))));
    }

    #[test]
    fn list_response_tolerates_missing_files() {
        let parsed: FileListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.files.is_empty());
    }
}
