use uuid::Uuid;

use crate::database::models::Gallery;
use crate::database::{CredentialStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Covers both a missing gallery and one the client holds no assignment for
    #[error("Gallery not found or access denied.")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve `slug` for `client_id`. The client and gallery lookups run concurrently.
pub async fn resolve(store: &dyn CredentialStore, client_id: Uuid, slug: &str) -> Result<Gallery, AccessError> {
    let (client, gallery) = futures::try_join!(store.find_client(client_id), store.find_gallery_by_slug(slug))?;

    match (client, gallery) {
        (Some(client), Some(gallery)) if client.has_gallery(gallery.id) => Ok(gallery),
        _ => {
            tracing::warn!("Client {} denied gallery '{}'", client_id, slug);
            Err(AccessError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::{NewClient, NewGallery};
    use crate::database::MemoryStore;

    async fn fixture() -> (MemoryStore, Uuid, Gallery, Gallery) {
        let store = MemoryStore::new();
        let client = store
            .insert_client(NewClient {
                name: "Ann".into(),
                username: "ann".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap();
        let mine = store
            .insert_gallery(NewGallery {
                name: "Summer Wedding".into(),
                slug: "summer-wedding".into(),
                folder_id: "F1".into(),
            })
            .await
            .unwrap();
        let other = store
            .insert_gallery(NewGallery {
                name: "Other".into(),
                slug: "other".into(),
                folder_id: "F2".into(),
            })
            .await
            .unwrap();
        store.add_client_gallery(client.id, mine.id).await.unwrap();
        (store, client.id, mine, other)
    }

    #[tokio::test]
    async fn assigned_gallery_resolves() {
        let (store, client_id, mine, _) = fixture().await;
        let gallery = resolve(&store, client_id, "summer-wedding").await.unwrap();
        assert_eq!(gallery.id, mine.id);
        assert_eq!(gallery.folder_id, "F1");
    }

    #[tokio::test]
    async fn unassigned_and_missing_look_the_same() {
        let (store, client_id, _, other) = fixture().await;
        let denied = resolve(&store, client_id, &other.slug).await.unwrap_err();
        let missing = resolve(&store, client_id, "no-such-gallery").await.unwrap_err();
        assert_eq!(denied.to_string(), missing.to_string());
        assert!(matches!(denied, AccessError::NotFound));
    }

    #[tokio::test]
    async fn unknown_client_is_denied() {
        let (store, _, mine, _) = fixture().await;
        let err = resolve(&store, Uuid::new_v4(), &mine.slug).await.unwrap_err();
        assert!(matches!(err, AccessError::NotFound));
    }
}
