use async_trait::async_trait;

use crate::config::NotifyConfig;
use crate::database::models::SelectedPhoto;
use super::helpers::folder_link;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Messaging provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Outbound message sink. Delivery is not confirmed beyond the provider accepting the request.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, body: &str) -> Result<(), NotifyError>;
}

/// Twilio Messages API (WhatsApp sender/recipient pair from config)
pub struct TwilioNotifier {
    http: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

impl TwilioNotifier {
    /// None when any credential is missing
    pub fn from_config(config: &NotifyConfig) -> Option<Self> {
        Some(Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone()?,
            auth_token: config.auth_token.clone()?,
            from: config.from.clone()?,
            to: config.to.clone()?,
        })
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, body: &str) -> Result<(), NotifyError> {
        let url = format!("{}/Accounts/{}/Messages.json", self.api_base, self.account_sid);
        let response = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("From", self.from.as_str()), ("To", self.to.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider { status, body });
        }
        tracing::info!("Selection notification sent to {}", self.to);
        Ok(())
    }
}

/// Used when messaging credentials are absent: the message only goes to the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, body: &str) -> Result<(), NotifyError> {
        tracing::info!(message = %body, "Notification (messaging disabled)");
        Ok(())
    }
}

/// Photographer-facing summary of a selection
pub fn selection_message(client_name: &str, client_phone: &str, folder_id: Option<&str>, photos: &[SelectedPhoto]) -> String {
    let folder = folder_id.map(folder_link).unwrap_or_else(|| "Not Found".to_string());
    let files: Vec<String> = photos.iter().map(|p| format!("- {}", p.name)).collect();
    format!(
        "*New Photo Selection!* ✅\n\n*Client:* {}\n*Phone:* {}\n*Total Selected:* {}\n\n*View Gallery Folder:*\n{}\n\n*Selected Files:*\n{}",
        client_name,
        client_phone,
        photos.len(),
        folder,
        files.join("\n")
    )
}
