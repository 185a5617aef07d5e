//! Router test harness: an app over `MemoryStore` with fake providers.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::auth::{generate_jwt, Claims};
use crate::config::{AppConfig, StoreBackend};
use crate::database::models::{Client, Gallery};
use crate::database::store::{NewClient, NewGallery};
use crate::database::{CredentialStore, MemoryStore};
use crate::services::drive::{DriveError, DriveFile, FileListingProvider};
use crate::services::notify::{NotifyError, Notifier};

/// Folder listings served from memory
#[derive(Default)]
pub struct FakeDrive {
    folders: HashMap<String, Vec<DriveFile>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` files named `IMG_0000.jpg` upward with ids `<folder>-<n>`
    pub fn with_folder(mut self, folder_id: &str, count: usize) -> Self {
        let files = (0..count)
            .map(|i| DriveFile {
                id: format!("{}-{}", folder_id, i),
                name: format!("IMG_{:04}.jpg", i),
            })
            .collect();
        self.folders.insert(folder_id.to_string(), files);
        self
    }
}

#[async_trait]
impl FileListingProvider for FakeDrive {
    async fn list_images(&self, folder_id: &str, cap: u32) -> Result<Vec<DriveFile>, DriveError> {
        let mut files = self.folders.get(folder_id).cloned().unwrap_or_default();
        files.truncate(cap as usize);
        Ok(files)
    }
}

/// Keeps every message body it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, body: &str) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(body.to_string());
        }
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.security.jwt_secret = "test-secret".to_string();
    // bcrypt's minimum keeps login tests fast
    config.security.bcrypt_cost = 4;
    config.server.public_dir = "/nonexistent-public-dir".to_string();
    config
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new(drive: FakeDrive) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState {
            store: store.clone(),
            files: Arc::new(drive),
            notifier: notifier.clone(),
            config: Arc::new(test_config()),
        };
        Self { state, store, notifier }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// One request through a fresh router; returns the status and JSON body (Null when not JSON)
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub fn admin_token(&self) -> String {
        let claims = Claims::admin("admin", 1);
        generate_jwt(&claims, &self.state.config.security).unwrap()
    }

    pub fn client_token(&self, client_id: Uuid) -> String {
        let claims = Claims::client(client_id, 1);
        generate_jwt(&claims, &self.state.config.security).unwrap()
    }

    pub async fn seed_gallery(&self, name: &str, folder_id: &str) -> Gallery {
        self.store
            .insert_gallery(NewGallery {
                name: name.to_string(),
                slug: crate::services::helpers::create_slug(name),
                folder_id: folder_id.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn seed_client(&self, name: &str, username: &str, password: &str, galleries: &[Uuid]) -> Client {
        let password_hash = crate::auth::hash_password(password, 4).unwrap();
        let client = self
            .store
            .insert_client(NewClient {
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await
            .unwrap();
        self.store.set_client_galleries(client.id, galleries.to_vec()).await.unwrap();
        self.store.find_client(client.id).await.unwrap().unwrap()
    }
}
