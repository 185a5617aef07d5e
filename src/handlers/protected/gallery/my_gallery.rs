// handlers/protected/gallery/my_gallery.rs - GET /api/my-gallery handler

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::query_number;
use crate::middleware::{ApiResponse, ApiResult, ClientUser};
use crate::services::gallery_access;
use crate::services::listing::{fetch_page, PhotoPage};

#[derive(Debug, Default, Deserialize)]
pub struct MyGalleryParams {
    pub slug: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/**
 * GET /api/my-gallery?slug=<slug>&page=<n>&limit=<n>
 *
 * Returns `{ photos: [{id, name, url}], totalPages, totalPhotos }` for one
 * page of the gallery's folder. The folder listing is fetched in full on
 * every call and sliced here. Missing and unassigned galleries are the same
 * 404 so existence does not leak.
 */
pub async fn my_gallery_get(
    State(state): State<AppState>,
    Extension(client): Extension<ClientUser>,
    Query(params): Query<MyGalleryParams>,
) -> ApiResult<PhotoPage> {
    let slug = params.slug.as_deref().map(str::trim).unwrap_or_default();
    if slug.is_empty() {
        return Err(ApiError::bad_request("Gallery slug is required."));
    }

    let listing = &state.config.listing;
    let page = query_number(&params.page).unwrap_or(1) as usize;
    let limit = query_number(&params.limit)
        .map(|l| l as usize)
        .unwrap_or(listing.gallery_page_size)
        .min(listing.upstream_cap as usize);

    let gallery = gallery_access::resolve(state.store.as_ref(), client.client_id, slug).await?;
    let photos = fetch_page(state.files.as_ref(), &gallery.folder_id, page, limit, listing).await?;

    tracing::debug!(
        "Client {} fetched page {}/{} of '{}'",
        client.client_id,
        page,
        photos.total_pages,
        gallery.slug
    );
    Ok(ApiResponse::success(photos))
}
