use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPhoto {
    pub id: String,
    pub name: String,
}

/// Append-only record of one selection submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub selected_photos: Vec<SelectedPhoto>,
    pub submitted_at: DateTime<Utc>,
    pub gallery_slug: Option<String>,
}
