// handlers/elevated/admin/galleries.rs - Gallery CRUD handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use super::ListParams;
use crate::app::AppState;
use crate::database::models::Gallery;
use crate::database::Page;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::services::admin::{self, parse_id, GalleryInput};

/// GET /api/galleries - search over name and slug, newest first
pub async fn galleries_get(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<Gallery>> {
    let query = params.into_query(state.config.listing.admin_page_size);
    Ok(ApiResponse::success(state.store.list_galleries(&query).await?))
}

/**
 * POST /api/galleries - Register a gallery for an external folder
 *
 * Input: { "name": "Summer Wedding", "folderLink": "https://drive.google.com/drive/folders/<id>", "clientId"?: "<uuid>" }
 *
 * The slug is derived from the name and never changes afterwards. A
 * duplicate slug is a 409.
 */
pub async fn galleries_post(
    State(state): State<AppState>,
    payload: Result<Json<GalleryInput>, JsonRejection>,
) -> ApiResult<Message> {
    admin::create_gallery(state.store.as_ref(), json_body(payload)?).await?;
    Ok(ApiResponse::created_message("Gallery created successfully!"))
}

/// GET /api/galleries/:id - one gallery record; a malformed id is a 400
pub async fn gallery_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Gallery> {
    let id = parse_id(&id, "gallery")?;
    Ok(ApiResponse::success(admin::find_gallery(state.store.as_ref(), id).await?))
}

/// DELETE /api/galleries/:id - delete, then unassign from every client (two writes)
pub async fn gallery_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Message> {
    let id = parse_id(&id, "gallery")?;
    admin::delete_gallery(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Gallery deleted successfully."))
}
