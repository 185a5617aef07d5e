// handlers/elevated/admin/contacts.rs - Contact handlers

use axum::extract::{Path, Query, State};

use super::ListParams;
use crate::app::AppState;
use crate::database::models::Contact;
use crate::database::Page;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::services::admin::{self, parse_id};

/// GET /api/contacts - search over name, email and phone
pub async fn contacts_get(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<Contact>> {
    let query = params.into_query(state.config.listing.admin_page_size);
    Ok(ApiResponse::success(state.store.list_contacts(&query).await?))
}

pub async fn contact_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Message> {
    let id = parse_id(&id, "contact")?;
    admin::delete_contact(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Contact deleted successfully."))
}
