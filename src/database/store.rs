use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::manager::StoreError;
use super::models::{AdminUser, Client, Contact, Gallery, SelectedPhoto, Submission};

/// Hard ceiling on admin list page size; the dashboard fetches cross-reference data with limit=1000
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Page request for admin lists. `search` is a case-insensitive substring filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl PageQuery {
    /// Clamp page to >= 1 and limit to 1..=MAX_PAGE_LIMIT; blank search becomes None
    pub fn new(page: Option<u64>, limit: Option<u64>, search: Option<String>, default_limit: u64) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit.filter(|l| *l >= 1).unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self { page, limit, search }
    }

    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(self.limit)
    }
}

/// `{data,total,page,totalPages}` admin list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, query: &PageQuery) -> Self {
        Self {
            data,
            total,
            page: query.page,
            total_pages: query.total_pages(total),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewGallery {
    pub name: String,
    pub slug: String,
    pub folder_id: String,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub name: String,
    pub username: String,
    /// Replaced only when present
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactUpsert {
    pub name: String,
    /// Already lowercased by the caller
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub selected_photos: Vec<SelectedPhoto>,
    pub gallery_slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_galleries: u64,
    pub total_clients: u64,
    pub total_selections: u64,
    pub unassigned_galleries: u64,
}

/// Persistence seam for admins, clients, galleries, contacts and submissions.
///
/// Mutations that touch several records (gallery delete + reference pull) are
/// separate calls with no atomicity between them.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Admin users
    async fn find_admin(&self, username: &str) -> Result<Option<AdminUser>, StoreError>;
    async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<AdminUser, StoreError>;

    // Clients
    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, StoreError>;
    async fn find_client_by_username(&self, username: &str) -> Result<Option<Client>, StoreError>;
    async fn list_clients(&self, query: &PageQuery) -> Result<Page<Client>, StoreError>;
    async fn insert_client(&self, client: NewClient) -> Result<Client, StoreError>;
    /// Returns false when no client matched
    async fn update_client(&self, id: Uuid, update: ClientUpdate) -> Result<bool, StoreError>;
    async fn set_client_galleries(&self, id: Uuid, gallery_ids: Vec<Uuid>) -> Result<bool, StoreError>;
    /// Set semantics: adding an id already present is a no-op
    async fn add_client_gallery(&self, id: Uuid, gallery_id: Uuid) -> Result<bool, StoreError>;
    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError>;

    // Galleries
    async fn find_gallery_by_slug(&self, slug: &str) -> Result<Option<Gallery>, StoreError>;
    async fn find_galleries(&self, ids: &[Uuid]) -> Result<Vec<Gallery>, StoreError>;
    async fn list_galleries(&self, query: &PageQuery) -> Result<Page<Gallery>, StoreError>;
    async fn insert_gallery(&self, gallery: NewGallery) -> Result<Gallery, StoreError>;
    async fn delete_gallery(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Removes the id from every client's assignment set; returns the number of clients touched
    async fn pull_gallery_from_clients(&self, gallery_id: Uuid) -> Result<u64, StoreError>;

    // Contacts and submissions
    async fn list_contacts(&self, query: &PageQuery) -> Result<Page<Contact>, StoreError>;
    async fn upsert_contact(&self, contact: ContactUpsert) -> Result<Contact, StoreError>;
    async fn delete_contact(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError>;
    /// Newest first, email compared case-insensitively
    async fn submissions_by_email(&self, email: &str) -> Result<Vec<Submission>, StoreError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError>;
}
