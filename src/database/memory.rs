use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::StoreError;
use super::models::{AdminUser, Client, Contact, Gallery, Submission};
use super::store::{
    ClientUpdate, ContactUpsert, CredentialStore, DashboardStats, NewClient, NewGallery, NewSubmission, Page,
    PageQuery,
};

#[derive(Default)]
struct Collections {
    admins: Vec<AdminUser>,
    clients: Vec<Client>,
    galleries: Vec<Gallery>,
    contacts: Vec<Contact>,
    submissions: Vec<Submission>,
}

/// In-process store with the same semantics as `PgStore`. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

fn matches(term: &Option<String>, fields: &[&str]) -> bool {
    match term {
        None => true,
        Some(term) => {
            let needle = term.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&needle))
        }
    }
}

/// Newest first, matching the Postgres ordering
fn paginate<T: Clone>(items: &[T], query: &PageQuery, keep: impl Fn(&T) -> bool) -> Page<T> {
    let filtered: Vec<&T> = items.iter().rev().filter(|item| keep(item)).collect();
    let total = filtered.len() as u64;
    let data = filtered
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.limit as usize)
        .cloned()
        .collect();
    Page::new(data, total, query)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminUser>, StoreError> {
        let data = self.data.read().await;
        Ok(data.admins.iter().find(|a| a.username == username).cloned())
    }

    async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<AdminUser, StoreError> {
        let mut data = self.data.write().await;
        if data.admins.iter().any(|a| a.username == username) {
            return Err(StoreError::Duplicate("Admin username already exists.".into()));
        }
        let admin = AdminUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        data.admins.push(admin.clone());
        Ok(admin)
    }

    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        let data = self.data.read().await;
        Ok(data.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_client_by_username(&self, username: &str) -> Result<Option<Client>, StoreError> {
        let data = self.data.read().await;
        Ok(data.clients.iter().find(|c| c.username == username).cloned())
    }

    async fn list_clients(&self, query: &PageQuery) -> Result<Page<Client>, StoreError> {
        let data = self.data.read().await;
        Ok(paginate(&data.clients, query, |c| matches(&query.search, &[c.name.as_str(), c.username.as_str()])))
    }

    async fn insert_client(&self, client: NewClient) -> Result<Client, StoreError> {
        let mut data = self.data.write().await;
        if data.clients.iter().any(|c| c.username == client.username) {
            return Err(StoreError::Duplicate("Username already exists.".into()));
        }
        let client = Client {
            id: Uuid::new_v4(),
            name: client.name,
            username: client.username,
            password_hash: client.password_hash,
            gallery_ids: vec![],
            created_at: Utc::now(),
        };
        data.clients.push(client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: Uuid, update: ClientUpdate) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        if data.clients.iter().any(|c| c.id != id && c.username == update.username) {
            return Err(StoreError::Duplicate("Username already exists.".into()));
        }
        let Some(client) = data.clients.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        client.name = update.name;
        client.username = update.username;
        if let Some(hash) = update.password_hash {
            client.password_hash = hash;
        }
        Ok(true)
    }

    async fn set_client_galleries(&self, id: Uuid, gallery_ids: Vec<Uuid>) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        match data.clients.iter_mut().find(|c| c.id == id) {
            Some(client) => {
                client.gallery_ids = gallery_ids;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_client_gallery(&self, id: Uuid, gallery_id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        match data.clients.iter_mut().find(|c| c.id == id) {
            Some(client) => {
                if !client.gallery_ids.contains(&gallery_id) {
                    client.gallery_ids.push(gallery_id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let before = data.clients.len();
        data.clients.retain(|c| c.id != id);
        Ok(data.clients.len() < before)
    }

    async fn find_gallery_by_slug(&self, slug: &str) -> Result<Option<Gallery>, StoreError> {
        let data = self.data.read().await;
        Ok(data.galleries.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_galleries(&self, ids: &[Uuid]) -> Result<Vec<Gallery>, StoreError> {
        let data = self.data.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| data.galleries.iter().find(|g| g.id == *id).cloned())
            .collect())
    }

    async fn list_galleries(&self, query: &PageQuery) -> Result<Page<Gallery>, StoreError> {
        let data = self.data.read().await;
        Ok(paginate(&data.galleries, query, |g| matches(&query.search, &[g.name.as_str(), g.slug.as_str()])))
    }

    async fn insert_gallery(&self, gallery: NewGallery) -> Result<Gallery, StoreError> {
        let mut data = self.data.write().await;
        if data.galleries.iter().any(|g| g.slug == gallery.slug) {
            return Err(StoreError::Duplicate("A gallery with this name already exists.".into()));
        }
        let gallery = Gallery {
            id: Uuid::new_v4(),
            name: gallery.name,
            slug: gallery.slug,
            folder_id: gallery.folder_id,
            created_at: Utc::now(),
        };
        data.galleries.push(gallery.clone());
        Ok(gallery)
    }

    async fn delete_gallery(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let before = data.galleries.len();
        data.galleries.retain(|g| g.id != id);
        Ok(data.galleries.len() < before)
    }

    async fn pull_gallery_from_clients(&self, gallery_id: Uuid) -> Result<u64, StoreError> {
        let mut data = self.data.write().await;
        let mut touched = 0;
        for client in data.clients.iter_mut().filter(|c| c.gallery_ids.contains(&gallery_id)) {
            client.gallery_ids.retain(|id| *id != gallery_id);
            touched += 1;
        }
        Ok(touched)
    }

    async fn list_contacts(&self, query: &PageQuery) -> Result<Page<Contact>, StoreError> {
        let data = self.data.read().await;
        Ok(paginate(&data.contacts, query, |c| {
            matches(&query.search, &[c.name.as_str(), c.email.as_str(), c.phone.as_str()])
        }))
    }

    async fn upsert_contact(&self, contact: ContactUpsert) -> Result<Contact, StoreError> {
        let mut data = self.data.write().await;
        let now = Utc::now();
        if let Some(existing) = data.contacts.iter_mut().find(|c| c.email == contact.email) {
            existing.name = contact.name;
            existing.phone = contact.phone;
            existing.last_submitted_at = now;
            return Ok(existing.clone());
        }
        let created = Contact {
            id: Uuid::new_v4(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: now,
            last_submitted_at: now,
        };
        data.contacts.push(created.clone());
        Ok(created)
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let before = data.contacts.len();
        data.contacts.retain(|c| c.id != id);
        Ok(data.contacts.len() < before)
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let mut data = self.data.write().await;
        let record = Submission {
            id: Uuid::new_v4(),
            client_name: submission.client_name,
            client_email: submission.client_email,
            client_phone: submission.client_phone,
            selected_photos: submission.selected_photos,
            submitted_at: Utc::now(),
            gallery_slug: submission.gallery_slug,
        };
        data.submissions.push(record.clone());
        Ok(record)
    }

    async fn submissions_by_email(&self, email: &str) -> Result<Vec<Submission>, StoreError> {
        let data = self.data.read().await;
        let email = email.to_lowercase();
        Ok(data
            .submissions
            .iter()
            .rev()
            .filter(|s| s.client_email.to_lowercase() == email)
            .cloned()
            .collect())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let data = self.data.read().await;
        let unassigned = data
            .galleries
            .iter()
            .filter(|g| !data.clients.iter().any(|c| c.has_gallery(g.id)))
            .count();
        Ok(DashboardStats {
            total_galleries: data.galleries.len() as u64,
            total_clients: data.clients.len() as u64,
            total_selections: data.submissions.len() as u64,
            unassigned_galleries: unassigned as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_gallery(name: &str) -> NewGallery {
        NewGallery {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            folder_id: format!("folder-{}", name.len()),
        }
    }

    fn new_client(username: &str) -> NewClient {
        NewClient {
            name: username.to_uppercase(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn gallery_slugs_are_unique() {
        let store = MemoryStore::new();
        store.insert_gallery(new_gallery("Summer Wedding")).await.unwrap();
        let err = store.insert_gallery(new_gallery("Summer Wedding")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn pulling_a_gallery_clears_every_client() {
        let store = MemoryStore::new();
        let gallery = store.insert_gallery(new_gallery("Summer Wedding")).await.unwrap();
        let other = store.insert_gallery(new_gallery("Autumn")).await.unwrap();
        let alice = store.insert_client(new_client("alice")).await.unwrap();
        let bob = store.insert_client(new_client("bob")).await.unwrap();
        store.set_client_galleries(alice.id, vec![gallery.id, other.id]).await.unwrap();
        store.set_client_galleries(bob.id, vec![gallery.id]).await.unwrap();

        assert!(store.delete_gallery(gallery.id).await.unwrap());
        assert_eq!(store.pull_gallery_from_clients(gallery.id).await.unwrap(), 2);

        let alice = store.find_client(alice.id).await.unwrap().unwrap();
        let bob = store.find_client(bob.id).await.unwrap().unwrap();
        assert_eq!(alice.gallery_ids, vec![other.id]);
        assert!(bob.gallery_ids.is_empty());
    }

    #[tokio::test]
    async fn add_client_gallery_has_set_semantics() {
        let store = MemoryStore::new();
        let gallery = store.insert_gallery(new_gallery("Studio")).await.unwrap();
        let client = store.insert_client(new_client("carol")).await.unwrap();
        store.add_client_gallery(client.id, gallery.id).await.unwrap();
        store.add_client_gallery(client.id, gallery.id).await.unwrap();
        let client = store.find_client(client.id).await.unwrap().unwrap();
        assert_eq!(client.gallery_ids, vec![gallery.id]);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_searchable() {
        let store = MemoryStore::new();
        for name in ["Anna Beach", "Bride Portraits", "Annual Gala"] {
            store.insert_gallery(new_gallery(name)).await.unwrap();
        }
        let page = store.list_galleries(&PageQuery::new(None, Some(2), None, 10)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].name, "Annual Gala");

        let page = store
            .list_galleries(&PageQuery::new(None, None, Some("ANN".into()), 10))
            .await
            .unwrap();
        let names: Vec<_> = page.data.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Annual Gala", "Anna Beach"]);
    }

    #[tokio::test]
    async fn contact_upsert_keeps_creation_time() {
        let store = MemoryStore::new();
        let first = store
            .upsert_contact(ContactUpsert { name: "Ann".into(), email: "ann@x.io".into(), phone: "123".into() })
            .await
            .unwrap();
        let second = store
            .upsert_contact(ContactUpsert { name: "Ann B".into(), email: "ann@x.io".into(), phone: "456".into() })
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.phone, "456");
        assert!(second.last_submitted_at >= first.last_submitted_at);
    }

    #[tokio::test]
    async fn stats_count_unassigned_galleries() {
        let store = MemoryStore::new();
        let a = store.insert_gallery(new_gallery("A gallery")).await.unwrap();
        store.insert_gallery(new_gallery("B gallery")).await.unwrap();
        let client = store.insert_client(new_client("dave")).await.unwrap();
        store.set_client_galleries(client.id, vec![a.id]).await.unwrap();

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_galleries, 2);
        assert_eq!(stats.total_clients, 1);
        assert_eq!(stats.unassigned_galleries, 1);
    }
}
