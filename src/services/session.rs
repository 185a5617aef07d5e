use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password_blocking, Claims, JwtError};
use crate::config::SecurityConfig;
use crate::database::models::GalleryLink;
use crate::database::{CredentialStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid admin credentials.")]
    InvalidAdminCredentials,
    #[error("Invalid client credentials.")]
    InvalidClientCredentials,
    #[error("You have not been assigned to any galleries yet.")]
    NotAssigned,
    #[error("Your assigned gallery could not be found. Please contact support.")]
    AssignedGalleryMissing,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] JwtError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub message: String,
    pub token: String,
    pub username: String,
}

/// What the client UI should do after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum LoginAction {
    Redirect { destination: String },
    Select { galleries: Vec<GalleryLink> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSession {
    pub message: String,
    pub token: String,
    pub client_name: String,
    #[serde(flatten)]
    pub action: LoginAction,
}

/// A malformed stored hash counts as a mismatch
async fn password_matches(password: &str, hash: &str) -> bool {
    match verify_password_blocking(password.to_string(), hash.to_string()).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Password verification failed: {}", e);
            false
        }
    }
}

pub async fn admin_login(
    store: &dyn CredentialStore,
    security: &SecurityConfig,
    username: &str,
    password: &str,
) -> Result<AdminSession, SessionError> {
    let username = username.trim().to_lowercase();
    let admin = match store.find_admin(&username).await? {
        Some(admin) if password_matches(password, &admin.password_hash).await => admin,
        _ => {
            tracing::warn!("Rejected admin login for '{}'", username);
            return Err(SessionError::InvalidAdminCredentials);
        }
    };

    let token = generate_jwt(&Claims::admin(&admin.username, security.jwt_expiry_hours), security)?;
    tracing::info!("Admin '{}' logged in", admin.username);

    Ok(AdminSession {
        message: "Admin login successful".to_string(),
        token,
        username: admin.username,
    })
}

/// Authenticate a client and decide where they land based on how many galleries they hold
pub async fn client_login(
    store: &dyn CredentialStore,
    security: &SecurityConfig,
    username: &str,
    password: &str,
) -> Result<ClientSession, SessionError> {
    let username = username.trim().to_lowercase();
    let client = match store.find_client_by_username(&username).await? {
        Some(client) if password_matches(password, &client.password_hash).await => client,
        _ => {
            tracing::warn!("Rejected client login for '{}'", username);
            return Err(SessionError::InvalidClientCredentials);
        }
    };

    let token = generate_jwt(&Claims::client(client.id, security.jwt_expiry_hours), security)?;

    let (message, action) = match client.gallery_ids.as_slice() {
        [] => return Err(SessionError::NotAssigned),
        [only] => {
            let gallery = store
                .find_galleries(std::slice::from_ref(only))
                .await?
                .into_iter()
                .next()
                .ok_or(SessionError::AssignedGalleryMissing)?;
            (
                "Login successful! Redirecting...",
                LoginAction::Redirect {
                    destination: format!("/gallery/{}", gallery.slug),
                },
            )
        }
        ids => {
            let galleries = store.find_galleries(ids).await?;
            (
                "Please select a gallery to view.",
                LoginAction::Select {
                    galleries: galleries.iter().map(GalleryLink::from).collect(),
                },
            )
        }
    };

    tracing::info!("Client '{}' logged in", client.username);
    Ok(ClientSession {
        message: message.to_string(),
        token,
        client_name: client.name,
        action,
    })
}
