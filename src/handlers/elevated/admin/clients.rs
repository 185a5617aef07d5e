// handlers/elevated/admin/clients.rs - Client account handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use super::ListParams;
use crate::app::AppState;
use crate::database::models::Client;
use crate::database::Page;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::services::admin::{self, parse_id, AssignmentInput, ClientInput};

/// GET /api/clients - search over name and username. Password hashes never leave the store.
pub async fn clients_get(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<Client>> {
    let query = params.into_query(state.config.listing.admin_page_size);
    Ok(ApiResponse::success(state.store.list_clients(&query).await?))
}

/// POST /api/clients - { name, username, password }, username stored lowercased
pub async fn clients_post(
    State(state): State<AppState>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> ApiResult<Message> {
    let input = json_body(payload)?;
    admin::create_client(state.store.as_ref(), state.config.security.bcrypt_cost, input).await?;
    Ok(ApiResponse::created_message("Client created successfully!"))
}

/// PUT /api/clients/:id - password is rehashed only when supplied
pub async fn client_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "client")?;
    let input = json_body(payload)?;
    admin::update_client(state.store.as_ref(), state.config.security.bcrypt_cost, id, input).await?;
    Ok(ApiResponse::message("Client updated successfully."))
}

/// PUT /api/clients/:id/galleries - { galleryIds } replaces the whole assignment set
pub async fn client_galleries_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AssignmentInput>, JsonRejection>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "client")?;
    let input = json_body(payload)?;
    admin::assign_galleries(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::message("Client galleries updated successfully."))
}

pub async fn client_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Message> {
    let id = parse_id(&id, "client")?;
    admin::delete_client(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Client deleted successfully."))
}
