use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password_blocking, JwtError};
use crate::database::models::{Client, Gallery, Submission};
use crate::database::store::{ClientUpdate, NewClient, NewGallery};
use crate::database::{CredentialStore, StoreError};
use super::helpers::{create_slug, extract_folder_id};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Hash(#[from] JwtError),
}

/// Body of `POST /api/galleries`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub folder_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Body of `POST /api/clients` and `PUT /api/clients/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `PUT /api/clients/:id/galleries`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    #[serde(default)]
    pub gallery_ids: Vec<String>,
}

pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AdminError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AdminError::Invalid(format!("Invalid {} id.", what)))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn create_gallery(store: &dyn CredentialStore, input: GalleryInput) -> Result<Gallery, AdminError> {
    let name = input.name.trim();
    if name.is_empty() || input.folder_link.trim().is_empty() {
        return Err(AdminError::Invalid("Gallery name and folder link are required.".into()));
    }
    let folder_id = extract_folder_id(&input.folder_link)
        .ok_or_else(|| AdminError::Invalid("Invalid Google Drive folder link.".into()))?;

    let slug = create_slug(name);
    if slug.trim_matches('-').is_empty() {
        return Err(AdminError::Invalid("Gallery name must contain letters or numbers.".into()));
    }

    // Resolve the owner first so a bad clientId leaves nothing behind
    let owner = match non_blank(&input.client_id) {
        Some(raw) => {
            let id = parse_id(raw, "client")?;
            store.find_client(id).await?.ok_or(AdminError::NotFound("Client not found."))?;
            Some(id)
        }
        None => None,
    };

    let gallery = store
        .insert_gallery(NewGallery {
            name: name.to_string(),
            slug,
            folder_id,
        })
        .await?;

    if let Some(client_id) = owner {
        store.add_client_gallery(client_id, gallery.id).await?;
    }
    tracing::info!("Created gallery '{}' ({})", gallery.slug, gallery.id);
    Ok(gallery)
}

/// Delete the gallery, then pull it from every client's assignment set.
///
/// The pull runs even when the record is already gone so a previous
/// half-finished delete gets repaired.
pub async fn find_gallery(store: &dyn CredentialStore, id: Uuid) -> Result<Gallery, AdminError> {
    store
        .find_galleries(&[id])
        .await?
        .into_iter()
        .next()
        .ok_or(AdminError::NotFound("Gallery not found."))
}

pub async fn delete_gallery(store: &dyn CredentialStore, id: Uuid) -> Result<(), AdminError> {
    let deleted = store.delete_gallery(id).await?;
    let pulled = store.pull_gallery_from_clients(id).await?;
    if !deleted && pulled == 0 {
        return Err(AdminError::NotFound("Gallery not found."));
    }
    tracing::info!("Deleted gallery {} (unassigned from {} clients)", id, pulled);
    Ok(())
}

pub async fn create_client(store: &dyn CredentialStore, bcrypt_cost: u32, input: ClientInput) -> Result<Client, AdminError> {
    let name = input.name.trim();
    let username = input.username.trim().to_lowercase();
    let password = match non_blank(&input.password) {
        Some(password) if !name.is_empty() && !username.is_empty() => password,
        _ => return Err(AdminError::Invalid("All fields are required.".into())),
    };

    if store.find_client_by_username(&username).await?.is_some() {
        return Err(StoreError::Duplicate("Username already exists.".into()).into());
    }

    let password_hash = hash_password_blocking(password.to_string(), bcrypt_cost).await?;
    let client = store
        .insert_client(NewClient {
            name: name.to_string(),
            username,
            password_hash,
        })
        .await?;
    tracing::info!("Created client '{}'", client.username);
    Ok(client)
}

pub async fn update_client(
    store: &dyn CredentialStore,
    bcrypt_cost: u32,
    id: Uuid,
    input: ClientInput,
) -> Result<(), AdminError> {
    let name = input.name.trim();
    let username = input.username.trim().to_lowercase();
    if name.is_empty() || username.is_empty() {
        return Err(AdminError::Invalid("Name and username are required.".into()));
    }

    let password_hash = match non_blank(&input.password) {
        Some(password) => Some(hash_password_blocking(password.to_string(), bcrypt_cost).await?),
        None => None,
    };

    let updated = store
        .update_client(
            id,
            ClientUpdate {
                name: name.to_string(),
                username,
                password_hash,
            },
        )
        .await?;
    if !updated {
        return Err(AdminError::NotFound("Client not found."));
    }
    tracing::info!("Updated client {}", id);
    Ok(())
}

/// Replace a client's assignment set. Unknown gallery ids are dropped; the kept ids are returned.
pub async fn assign_galleries(
    store: &dyn CredentialStore,
    client_id: Uuid,
    input: AssignmentInput,
) -> Result<Vec<Uuid>, AdminError> {
    let mut requested = Vec::with_capacity(input.gallery_ids.len());
    for raw in &input.gallery_ids {
        let id = parse_id(raw, "gallery")?;
        if !requested.contains(&id) {
            requested.push(id);
        }
    }

    let existing: Vec<Uuid> = store.find_galleries(&requested).await?.iter().map(|g| g.id).collect();
    if existing.len() < requested.len() {
        tracing::warn!(
            "Dropping {} unknown gallery ids for client {}",
            requested.len() - existing.len(),
            client_id
        );
    }

    if !store.set_client_galleries(client_id, existing.clone()).await? {
        return Err(AdminError::NotFound("Client not found."));
    }
    tracing::info!("Client {} now holds {} galleries", client_id, existing.len());
    Ok(existing)
}

pub async fn delete_client(store: &dyn CredentialStore, id: Uuid) -> Result<(), AdminError> {
    if !store.delete_client(id).await? {
        return Err(AdminError::NotFound("Client not found."));
    }
    tracing::info!("Deleted client {}", id);
    Ok(())
}

pub async fn delete_contact(store: &dyn CredentialStore, id: Uuid) -> Result<(), AdminError> {
    if !store.delete_contact(id).await? {
        return Err(AdminError::NotFound("Contact not found."));
    }
    tracing::info!("Deleted contact {}", id);
    Ok(())
}

/// Create an admin account unless one with that username exists. Returns true when created.
pub async fn ensure_admin(
    store: &dyn CredentialStore,
    bcrypt_cost: u32,
    username: &str,
    password: &str,
) -> Result<bool, AdminError> {
    let username = username.trim().to_lowercase();
    if username.is_empty() || password.is_empty() {
        return Err(AdminError::Invalid("Admin username and password are required.".into()));
    }
    if store.find_admin(&username).await?.is_some() {
        return Ok(false);
    }
    let password_hash = hash_password_blocking(password.to_string(), bcrypt_cost).await?;
    store.insert_admin(&username, &password_hash).await?;
    tracing::info!("Created admin '{}'", username);
    Ok(true)
}

pub async fn submission_history(store: &dyn CredentialStore, email: &str) -> Result<Vec<Submission>, AdminError> {
    Ok(store.submissions_by_email(email.trim()).await?)
}
