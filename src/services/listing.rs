use serde::{Deserialize, Serialize};

use crate::config::ListingConfig;
use super::drive::{DriveError, DriveFile, FileListingProvider};
use super::helpers::thumbnail_url;

/// One photo as shown to a client. Rebuilt from the folder listing on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDescriptor {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPage {
    pub photos: Vec<PhotoDescriptor>,
    pub total_pages: usize,
    #[serde(default)]
    pub total_photos: usize,
}

/// Slice `[(page-1)*page_size, page*page_size)` out of the full listing.
///
/// A page past the end yields an empty slice with the real totals so callers
/// can stop fetching once `page > total_pages`.
pub fn paginate(files: &[DriveFile], page: usize, page_size: usize, thumbnail_width: u32) -> PhotoPage {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_photos = files.len();
    let total_pages = total_photos.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size).min(total_photos);
    let end = start.saturating_add(page_size).min(total_photos);

    let photos = files[start..end]
        .iter()
        .map(|file| PhotoDescriptor {
            id: file.id.clone(),
            name: file.name.clone(),
            url: thumbnail_url(&file.id, thumbnail_width),
        })
        .collect();

    PhotoPage {
        photos,
        total_pages,
        total_photos,
    }
}

/// Fetch the folder's complete listing (capped upstream) and return one page of it
pub async fn fetch_page(
    provider: &dyn FileListingProvider,
    folder_id: &str,
    page: usize,
    page_size: usize,
    listing: &ListingConfig,
) -> Result<PhotoPage, DriveError> {
    let files = provider.list_images(folder_id, listing.upstream_cap).await?;
    Ok(paginate(&files, page, page_size, listing.thumbnail_width))
}
