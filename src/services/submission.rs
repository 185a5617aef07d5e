use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{SelectedPhoto, Submission};
use crate::database::store::{ContactUpsert, NewSubmission};
use crate::database::{CredentialStore, StoreError};
use super::helpers::contact_field_errors;
use super::notify::{selection_message, Notifier};

/// Body of `POST /api/submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub selected_photos: Vec<SelectedPhoto>,
    #[serde(default)]
    pub gallery_slug: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Please select at least one photo.")]
    NoSelection,
    #[error("Please check your contact details.")]
    InvalidContact(HashMap<String, String>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SelectionRequest {
    /// Same checks the gallery UI runs before sending
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.selected_photos.is_empty() {
            return Err(SubmitError::NoSelection);
        }
        let errors = contact_field_errors(&self.client_name, &self.client_email, &self.client_phone);
        if !errors.is_empty() {
            return Err(SubmitError::InvalidContact(errors));
        }
        Ok(())
    }
}

/// Persist the selection, upsert the contact, then notify the photographer.
///
/// The submission is durable before the notification is attempted; a failed
/// notification is logged and does not fail the request.
pub async fn submit(
    store: &dyn CredentialStore,
    notifier: &dyn Notifier,
    request: SelectionRequest,
) -> Result<Submission, SubmitError> {
    request.validate()?;

    let client_name = request.client_name.trim().to_string();
    let client_email = request.client_email.trim().to_string();
    let client_phone = request.client_phone.trim().to_string();
    let gallery_slug = request.gallery_slug.filter(|s| !s.trim().is_empty());

    let submission = store
        .insert_submission(NewSubmission {
            client_name: client_name.clone(),
            client_email: client_email.clone(),
            client_phone: client_phone.clone(),
            selected_photos: request.selected_photos,
            gallery_slug: gallery_slug.clone(),
        })
        .await?;

    store
        .upsert_contact(ContactUpsert {
            name: client_name.clone(),
            email: client_email.to_lowercase(),
            phone: client_phone.clone(),
        })
        .await?;

    let gallery = match &gallery_slug {
        Some(slug) => store.find_gallery_by_slug(slug).await?,
        None => None,
    };
    tracing::info!(
        "Stored {} selections from {} for gallery {:?}",
        submission.selected_photos.len(),
        client_email,
        gallery_slug
    );

    let body = selection_message(
        &client_name,
        &client_phone,
        gallery.as_ref().map(|g| g.folder_id.as_str()),
        &submission.selected_photos,
    );
    if let Err(e) = notifier.send(&body).await {
        tracing::error!("Selection notification failed: {}", e);
    }

    Ok(submission)
}
