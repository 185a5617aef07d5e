use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A client-facing gallery backed by one external folder. The slug never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub folder_id: String,
    pub created_at: DateTime<Utc>,
}

/// Name and slug only, as offered to a client choosing between galleries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryLink {
    pub name: String,
    pub slug: String,
}

impl From<&Gallery> for GalleryLink {
    fn from(gallery: &Gallery) -> Self {
        Self {
            name: gallery.name.clone(),
            slug: gallery.slug.clone(),
        }
    }
}
