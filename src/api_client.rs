use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::database::models::{Client, Contact, Gallery, Submission};
use crate::database::{DashboardStats, Page};
use crate::middleware::Message;
use crate::services::admin::{AssignmentInput, ClientInput, GalleryInput};
use crate::services::listing::PhotoPage;
use crate::services::session::{AdminSession, ClientSession};
use crate::services::submission::SelectionRequest;
use crate::ui::dashboard::ListRequest;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx response; `message` comes from the `{message}` body when present
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message, without the status suffix
    pub fn message(&self) -> String {
        match self {
            ClientError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Typed client for the gallery HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        Self::send(self.request(Method::GET, "/health")?).await
    }

    pub async fn admin_login(&self, username: &str, password: &str) -> Result<AdminSession, ClientError> {
        let builder = self
            .request(Method::POST, "/api/auth/login")?
            .json(&Credentials { username, password });
        Self::send(builder).await
    }

    pub async fn client_login(&self, username: &str, password: &str) -> Result<ClientSession, ClientError> {
        let builder = self
            .request(Method::POST, "/api/auth/client-login")?
            .json(&Credentials { username, password });
        Self::send(builder).await
    }

    pub async fn my_gallery(&self, slug: &str, page: usize, limit: usize) -> Result<PhotoPage, ClientError> {
        let builder = self
            .request(Method::GET, "/api/my-gallery")?
            .query(&[("slug", slug.to_string()), ("page", page.to_string()), ("limit", limit.to_string())]);
        Self::send(builder).await
    }

    pub async fn submit(&self, request: &SelectionRequest) -> Result<Message, ClientError> {
        Self::send(self.request(Method::POST, "/api/submit")?.json(request)).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        Self::send(self.request(Method::GET, "/api/dashboard-stats")?).await
    }

    fn list(&self, path: &str, request: &ListRequest) -> Result<RequestBuilder, ClientError> {
        let mut query = vec![("page", request.page.to_string()), ("limit", request.limit.to_string())];
        if let Some(search) = &request.search {
            query.push(("search", search.clone()));
        }
        Ok(self.request(Method::GET, path)?.query(&query))
    }

    pub async fn galleries(&self, request: &ListRequest) -> Result<Page<Gallery>, ClientError> {
        Self::send(self.list("/api/galleries", request)?).await
    }

    pub async fn clients(&self, request: &ListRequest) -> Result<Page<Client>, ClientError> {
        Self::send(self.list("/api/clients", request)?).await
    }

    pub async fn contacts(&self, request: &ListRequest) -> Result<Page<Contact>, ClientError> {
        Self::send(self.list("/api/contacts", request)?).await
    }

    pub async fn create_gallery(&self, input: &GalleryInput) -> Result<Message, ClientError> {
        Self::send(self.request(Method::POST, "/api/galleries")?.json(input)).await
    }

    pub async fn delete_gallery(&self, id: Uuid) -> Result<Message, ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/api/galleries/{}", id))?).await
    }

    pub async fn create_client(&self, input: &ClientInput) -> Result<Message, ClientError> {
        Self::send(self.request(Method::POST, "/api/clients")?.json(input)).await
    }

    pub async fn update_client(&self, id: Uuid, input: &ClientInput) -> Result<Message, ClientError> {
        Self::send(self.request(Method::PUT, &format!("/api/clients/{}", id))?.json(input)).await
    }

    pub async fn assign_galleries(&self, id: Uuid, gallery_ids: &[Uuid]) -> Result<Message, ClientError> {
        let body = AssignmentInput {
            gallery_ids: gallery_ids.iter().map(Uuid::to_string).collect(),
        };
        Self::send(self.request(Method::PUT, &format!("/api/clients/{}/galleries", id))?.json(&body)).await
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<Message, ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/api/clients/{}", id))?).await
    }

    pub async fn delete_contact(&self, id: Uuid) -> Result<Message, ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/api/contacts/{}", id))?).await
    }

    pub async fn submissions(&self, email: &str) -> Result<Vec<Submission>, ClientError> {
        let mut url = self.base_url.join("/api/submissions/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(email);
        let builder = self.http.get(url);
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        Self::send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Url(_))));
    }

    #[test]
    fn paths_resolve_against_the_server_root() {
        let client = ApiClient::new("http://localhost:3000/ignored/").unwrap();
        let url = client.base_url().join("/api/galleries").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/galleries");
    }

    #[test]
    fn status_errors_expose_the_server_message() {
        let err = ClientError::Status {
            status: 401,
            message: "Invalid client credentials.".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Invalid client credentials.");
    }
}
