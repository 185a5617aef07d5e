use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Always stored lowercased
    pub username: String,
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub gallery_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn has_gallery(&self, gallery_id: Uuid) -> bool {
        self.gallery_ids.contains(&gallery_id)
    }
}
