use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::manager::StoreError;
use super::models::{AdminUser, Client, Contact, Gallery, SelectedPhoto, Submission};
use super::store::{
    ClientUpdate, ContactUpsert, CredentialStore, DashboardStats, NewClient, NewGallery, NewSubmission, Page,
    PageQuery,
};

const GALLERY_COLUMNS: &str = "id, name, slug, folder_id, created_at";
const CLIENT_COLUMNS: &str = "id, name, username, password, gallery_ids, created_at";
const CONTACT_COLUMNS: &str = "id, name, email, phone, created_at, last_submitted_at";
const SUBMISSION_COLUMNS: &str =
    "id, client_name, client_email, client_phone, selected_photos, submitted_at, gallery_slug";

/// Row shape for submissions; photos live in a JSONB column
#[derive(FromRow)]
struct SubmissionRow {
    id: Uuid,
    client_name: String,
    client_email: String,
    client_phone: String,
    selected_photos: Json<Vec<SelectedPhoto>>,
    submitted_at: DateTime<Utc>,
    gallery_slug: Option<String>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            selected_photos: row.selected_photos.0,
            submitted_at: row.submitted_at,
            gallery_slug: row.gallery_slug,
        }
    }
}

/// Escape LIKE metacharacters so search terms match literally
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Map unique-constraint violations to `StoreError::Duplicate`
fn duplicate_as(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate(message.to_string()),
        _ => StoreError::Sqlx(err),
    }
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest-first page over `table`, optionally filtered by ILIKE on `search_fields`
    async fn list_page<T>(
        &self,
        table: &str,
        columns: &str,
        search_fields: &[&str],
        query: &PageQuery,
    ) -> Result<Page<T>, StoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let where_clause = match &query.search {
            Some(_) if !search_fields.is_empty() => {
                let ors: Vec<String> = search_fields.iter().map(|f| format!("{} ILIKE $1", f)).collect();
                format!("WHERE ({})", ors.join(" OR "))
            }
            _ => String::new(),
        };
        let has_search = !where_clause.is_empty();

        let count_sql = format!("SELECT COUNT(*) FROM {} {}", table, where_clause);
        let (limit_idx, offset_idx) = if has_search { (2, 3) } else { (1, 2) };
        let select_sql = format!(
            "SELECT {} FROM {} {} ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            columns, table, where_clause, limit_idx, offset_idx
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, T>(&select_sql);
        if has_search {
            let pattern = like_pattern(query.search.as_deref().unwrap_or_default());
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }

        let total = count_query.fetch_one(&self.pool).await?;
        let data = select_query
            .bind(query.limit as i64)
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(data, total.max(0) as u64, query))
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, sql: &str) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminUser>, StoreError> {
        let admin = sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password, created_at FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<AdminUser, StoreError> {
        sqlx::query_as::<_, AdminUser>(
            "INSERT INTO admin_users (id, username, password) VALUES ($1, $2, $3)
             RETURNING id, username, password, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, "Admin username already exists."))
    }

    async fn find_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        let sql = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);
        Ok(sqlx::query_as::<_, Client>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_client_by_username(&self, username: &str) -> Result<Option<Client>, StoreError> {
        let sql = format!("SELECT {} FROM clients WHERE username = $1", CLIENT_COLUMNS);
        Ok(sqlx::query_as::<_, Client>(&sql).bind(username).fetch_optional(&self.pool).await?)
    }

    async fn list_clients(&self, query: &PageQuery) -> Result<Page<Client>, StoreError> {
        self.list_page("clients", CLIENT_COLUMNS, &["name", "username"], query).await
    }

    async fn insert_client(&self, client: NewClient) -> Result<Client, StoreError> {
        let sql = format!(
            "INSERT INTO clients (id, name, username, password, gallery_ids) VALUES ($1, $2, $3, $4, '{{}}')
             RETURNING {}",
            CLIENT_COLUMNS
        );
        sqlx::query_as::<_, Client>(&sql)
            .bind(Uuid::new_v4())
            .bind(&client.name)
            .bind(&client.username)
            .bind(&client.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_as(e, "Username already exists."))
    }

    async fn update_client(&self, id: Uuid, update: ClientUpdate) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE clients SET name = $2, username = $3, password = COALESCE($4, password) WHERE id = $1",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.username)
        .bind(update.password_hash.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, "Username already exists."))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_client_galleries(&self, id: Uuid, gallery_ids: Vec<Uuid>) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE clients SET gallery_ids = $2 WHERE id = $1")
            .bind(id)
            .bind(&gallery_ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_client_gallery(&self, id: Uuid, gallery_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE clients SET gallery_ids = CASE WHEN $2 = ANY(gallery_ids) THEN gallery_ids
                                                  ELSE array_append(gallery_ids, $2) END
             WHERE id = $1",
        )
        .bind(id)
        .bind(gallery_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("clients", id).await
    }

    async fn find_gallery_by_slug(&self, slug: &str) -> Result<Option<Gallery>, StoreError> {
        let sql = format!("SELECT {} FROM galleries WHERE slug = $1", GALLERY_COLUMNS);
        Ok(sqlx::query_as::<_, Gallery>(&sql).bind(slug).fetch_optional(&self.pool).await?)
    }

    async fn find_galleries(&self, ids: &[Uuid]) -> Result<Vec<Gallery>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM galleries WHERE id = ANY($1)", GALLERY_COLUMNS);
        let mut galleries = sqlx::query_as::<_, Gallery>(&sql).bind(ids).fetch_all(&self.pool).await?;
        // Keep the caller's order
        galleries.sort_by_key(|g| ids.iter().position(|id| *id == g.id));
        Ok(galleries)
    }

    async fn list_galleries(&self, query: &PageQuery) -> Result<Page<Gallery>, StoreError> {
        self.list_page("galleries", GALLERY_COLUMNS, &["name", "slug"], query).await
    }

    async fn insert_gallery(&self, gallery: NewGallery) -> Result<Gallery, StoreError> {
        let sql = format!(
            "INSERT INTO galleries (id, name, slug, folder_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            GALLERY_COLUMNS
        );
        sqlx::query_as::<_, Gallery>(&sql)
            .bind(Uuid::new_v4())
            .bind(&gallery.name)
            .bind(&gallery.slug)
            .bind(&gallery.folder_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_as(e, "A gallery with this name already exists."))
    }

    async fn delete_gallery(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("galleries", id).await
    }

    async fn pull_gallery_from_clients(&self, gallery_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE clients SET gallery_ids = array_remove(gallery_ids, $1) WHERE $1 = ANY(gallery_ids)",
        )
        .bind(gallery_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_contacts(&self, query: &PageQuery) -> Result<Page<Contact>, StoreError> {
        self.list_page("contacts", CONTACT_COLUMNS, &["name", "email", "phone"], query).await
    }

    async fn upsert_contact(&self, contact: ContactUpsert) -> Result<Contact, StoreError> {
        let sql = format!(
            "INSERT INTO contacts (id, name, email, phone, created_at, last_submitted_at)
             VALUES ($1, $2, $3, $4, now(), now())
             ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name, phone = EXCLUDED.phone, last_submitted_at = now()
             RETURNING {}",
            CONTACT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(Uuid::new_v4())
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("contacts", id).await
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let sql = format!(
            "INSERT INTO submissions (id, client_name, client_email, client_phone, selected_photos, gallery_slug)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SUBMISSION_COLUMNS
        );
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&submission.client_name)
            .bind(&submission.client_email)
            .bind(&submission.client_phone)
            .bind(Json(&submission.selected_photos))
            .bind(submission.gallery_slug.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn submissions_by_email(&self, email: &str) -> Result<Vec<Submission>, StoreError> {
        let sql = format!(
            "SELECT {} FROM submissions WHERE lower(client_email) = lower($1) ORDER BY submitted_at DESC",
            SUBMISSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql).bind(email).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let (total_galleries, total_clients, total_selections, unassigned_galleries) = futures::try_join!(
            self.count("SELECT COUNT(*) FROM galleries"),
            self.count("SELECT COUNT(*) FROM clients"),
            self.count("SELECT COUNT(*) FROM submissions"),
            self.count(
                "SELECT COUNT(*) FROM galleries g
                 WHERE NOT EXISTS (SELECT 1 FROM clients c WHERE g.id = ANY(c.gallery_ids))"
            ),
        )?;

        Ok(DashboardStats {
            total_galleries,
            total_clients,
            total_selections,
            unassigned_galleries,
        })
    }
}
