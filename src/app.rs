use axum::{
    extract::{Request, State},
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::CredentialStore;
use crate::handlers;
use crate::middleware::{admin_auth_middleware, client_auth_middleware};
use crate::services::{FileListingProvider, Notifier};

/// Shared collaborators handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub files: Arc<dyn FileListingProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Client JWT
        .merge(client_routes(state.clone()))
        // Admin JWT
        .merge(admin_routes(state.clone()))
        // HTML shells and static assets
        .merge(page_routes(&state))
        // Global middleware
        .layer(cors_layer(&state.config.security))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::{self, auth};

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/client-login", post(auth::client_login_post))
        .route("/api/submit", post(public::submit_post))
}

fn client_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/api/my-gallery", get(protected::my_gallery_get))
        .route_layer(middleware::from_fn_with_state(state, client_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::elevated as admin;

    Router::new()
        .route("/api/dashboard-stats", get(admin::dashboard_stats_get))
        .route("/api/galleries", get(admin::galleries_get).post(admin::galleries_post))
        .route("/api/galleries/:id", get(admin::gallery_get).delete(admin::gallery_delete))
        .route("/api/clients", get(admin::clients_get).post(admin::clients_post))
        .route("/api/clients/:id", put(admin::client_put).delete(admin::client_delete))
        .route("/api/clients/:id/galleries", put(admin::client_galleries_put))
        .route("/api/contacts", get(admin::contacts_get))
        .route("/api/contacts/:id", delete(admin::contact_delete))
        .route("/api/submissions/:email", get(admin::submissions_get))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

/// `/gallery/:slug` and `/dashboard` serve the HTML shells; everything else falls through to the public dir
fn page_routes(state: &AppState) -> Router<AppState> {
    let public = Path::new(&state.config.server.public_dir);

    Router::new()
        .route_service("/gallery/:slug", ServeFile::new(public.join("index.html")))
        .route_service("/dashboard", ServeFile::new(public.join("dashboard.html")))
        .fallback_service(ServeDir::new(public).not_found_service(not_found.into_service()))
        .layer(middleware::from_fn_with_state(state.clone(), cache_headers))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

/// HTML is always revalidated; other assets are cached for the configured max-age
async fn cache_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));
    let value = if is_html {
        HeaderValue::from_static("no-cache")
    } else {
        match HeaderValue::from_str(&format!("public, max-age={}", state.config.server.static_max_age_secs)) {
            Ok(value) => value,
            Err(_) => return response,
        }
    };
    response.headers_mut().insert(header::CACHE_CONTROL, value);
    response
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">",
            "<title>Page Not Found</title></head><body>",
            "<h1>404 - Page Not Found</h1><p>The page you are looking for does not exist.</p>",
            "<p><a href=\"/\">Return to Home</a></p></body></html>"
        )),
    )
}

async fn root(State(state): State<AppState>) -> Response {
    let index = Path::new(&state.config.server.public_dir).join("index.html");
    if let Ok(html) = tokio::fs::read_to_string(&index).await {
        return ([(header::CACHE_CONTROL, "no-cache")], Html(html)).into_response();
    }

    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "name": "Client Gallery",
        "version": version,
        "description": "Client photo gallery delivery and selection API",
        "endpoints": {
            "auth": "/api/auth/login, /api/auth/client-login (public)",
            "submit": "/api/submit (public)",
            "gallery": "/api/my-gallery?slug&page&limit (client token)",
            "admin": "/api/galleries, /api/clients, /api/contacts, /api/dashboard-stats, /api/submissions/:email (admin token)",
            "pages": "/gallery/:slug, /dashboard",
        }
    }))
    .into_response()
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "message": "database unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::database::CredentialStore;
    use crate::services::admin::ensure_admin;
    use crate::testing::{FakeDrive, TestApp};

    #[tokio::test]
    async fn health_reports_store_status() {
        let app = TestApp::new(FakeDrive::new());
        let (status, body) = app.request(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn wrong_client_password_is_401() {
        let app = TestApp::new(FakeDrive::new());
        app.seed_client("Alice", "alice", "right", &[]).await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/auth/client-login",
                None,
                Some(json!({ "username": "alice", "password": "wrong" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid client credentials.");
    }

    #[tokio::test]
    async fn client_login_branches_on_assignment_count() {
        let app = TestApp::new(FakeDrive::new());
        let wedding = app.seed_gallery("Summer Wedding", "f1").await;
        let party = app.seed_gallery("Garden Party", "f2").await;
        app.seed_client("Zero", "zero", "pw", &[]).await;
        app.seed_client("One", "one", "pw", &[wedding.id]).await;
        app.seed_client("Many", "many", "pw", &[wedding.id, party.id]).await;

        let login = |username: &'static str| {
            let app = &app;
            async move {
                app.request(
                    Method::POST,
                    "/api/auth/client-login",
                    None,
                    Some(json!({ "username": username, "password": "pw" })),
                )
                .await
            }
        };

        let (status, body) = login("zero").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You have not been assigned to any galleries yet.");

        let (status, body) = login("one").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "redirect");
        assert_eq!(body["destination"], "/gallery/summer-wedding");
        assert_eq!(body["clientName"], "One");

        let (status, body) = login("many").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "select");
        assert_eq!(
            body["galleries"],
            json!([
                { "name": "Summer Wedding", "slug": "summer-wedding" },
                { "name": "Garden Party", "slug": "garden-party" },
            ])
        );
    }

    #[tokio::test]
    async fn third_page_of_120_photos() {
        let app = TestApp::new(FakeDrive::new().with_folder("wed", 120));
        let gallery = app.seed_gallery("Summer Wedding", "wed").await;
        let client = app.seed_client("Ann", "ann", "pw", &[gallery.id]).await;
        let token = app.client_token(client.id);

        let (status, body) = app
            .request(Method::GET, "/api/my-gallery?slug=summer-wedding&page=3&limit=50", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["totalPhotos"], 120);
        let photos = body["photos"].as_array().unwrap();
        assert_eq!(photos.len(), 20);
        assert_eq!(photos[0]["id"], "wed-100");
        assert_eq!(photos[19]["id"], "wed-119");
    }

    #[tokio::test]
    async fn gallery_access_is_guarded() {
        let app = TestApp::new(FakeDrive::new().with_folder("wed", 3));
        let gallery = app.seed_gallery("Summer Wedding", "wed").await;
        let owner = app.seed_client("Ann", "ann", "pw", &[gallery.id]).await;
        let stranger = app.seed_client("Bob", "bob", "pw", &[]).await;
        let uri = "/api/my-gallery?slug=summer-wedding";

        let (status, _) = app.request(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = app.admin_token();
        let (status, _) = app.request(Method::GET, uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, denied) = app.request(Method::GET, uri, Some(&app.client_token(stranger.id)), None).await;
        let (_, missing) = app
            .request(Method::GET, "/api/my-gallery?slug=nope", Some(&app.client_token(owner.id)), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(denied, missing);

        let (status, _) = app.request(Method::GET, "/api/my-gallery", Some(&app.client_token(owner.id)), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_routes_reject_client_tokens() {
        let app = TestApp::new(FakeDrive::new());
        let client = app.seed_client("Ann", "ann", "pw", &[]).await;
        let (status, body) = app
            .request(Method::GET, "/api/galleries", Some(&app.client_token(client.id)), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Admin authentication failed.");
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in_and_read_stats() {
        let app = TestApp::new(FakeDrive::new());
        ensure_admin(app.store.as_ref(), 4, "Admin", "secret").await.unwrap();

        let (status, body) = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": "admin", "password": "secret" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "admin");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, stats) = app.request(Method::GET, "/api/dashboard-stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalGalleries"], 0);
    }

    #[tokio::test]
    async fn create_gallery_assigns_and_lists() {
        let app = TestApp::new(FakeDrive::new());
        let client = app.seed_client("Ann", "ann", "pw", &[]).await;
        let token = app.admin_token();

        let (status, body) = app
            .request(
                Method::POST,
                "/api/galleries",
                Some(&token),
                Some(json!({
                    "name": "Summer Wedding",
                    "folderLink": "https://drive.google.com/drive/folders/abc123",
                    "clientId": client.id.to_string(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Gallery created successfully!");

        let (status, page) = app.request(Method::GET, "/api/galleries?search=summer", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["data"][0]["slug"], "summer-wedding");
        assert_eq!(page["data"][0]["folderId"], "abc123");

        let stored = app.store.find_client(client.id).await.unwrap().unwrap();
        assert_eq!(stored.gallery_ids.len(), 1);

        let (status, body) = app
            .request(
                Method::POST,
                "/api/galleries",
                Some(&token),
                Some(json!({ "name": "Bad", "folderLink": "https://example.com/nothing" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid Google Drive folder link.");
    }

    #[tokio::test]
    async fn deleting_a_gallery_unassigns_it_everywhere() {
        let app = TestApp::new(FakeDrive::new());
        let keep = app.seed_gallery("Keep", "k").await;
        let doomed = app.seed_gallery("Doomed", "d").await;
        let ann = app.seed_client("Ann", "ann", "pw", &[keep.id, doomed.id]).await;
        let bob = app.seed_client("Bob", "bob", "pw", &[doomed.id]).await;
        let token = app.admin_token();

        let (status, _) = app
            .request(Method::DELETE, &format!("/api/galleries/{}", doomed.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let ann = app.store.find_client(ann.id).await.unwrap().unwrap();
        let bob = app.store.find_client(bob.id).await.unwrap().unwrap();
        assert_eq!(ann.gallery_ids, vec![keep.id]);
        assert!(bob.gallery_ids.is_empty());

        let (status, _) = app
            .request(Method::DELETE, &format!("/api/galleries/{}", doomed.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn submission_is_stored_and_notified() {
        let app = TestApp::new(FakeDrive::new());
        app.seed_gallery("Summer Wedding", "wed").await;

        let (status, _) = app
            .request(
                Method::POST,
                "/api/submit",
                None,
                Some(json!({
                    "clientName": "Ann",
                    "clientEmail": "Ann@Example.com",
                    "clientPhone": "5551234567",
                    "selectedPhotos": [],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.notifier.sent().is_empty());

        let (status, body) = app
            .request(
                Method::POST,
                "/api/submit",
                None,
                Some(json!({
                    "clientName": "Ann",
                    "clientEmail": "Ann@Example.com",
                    "clientPhone": "5551234567",
                    "selectedPhotos": [{ "id": "wed-1", "name": "IMG_0001.jpg" }],
                    "gallerySlug": "summer-wedding",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Selections submitted and processed successfully!");
        assert_eq!(app.notifier.sent().len(), 1);

        let token = app.admin_token();
        let (_, contacts) = app.request(Method::GET, "/api/contacts", Some(&token), None).await;
        assert_eq!(contacts["data"][0]["email"], "ann@example.com");

        let (status, history) = app
            .request(Method::GET, "/api/submissions/ann@example.com", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn responses_are_gzipped_when_accepted() {
        use axum::{body::Body, http::{header, Request}};
        use tower::ServiceExt;

        let app = TestApp::new(FakeDrive::new());
        let request = Request::builder()
            .uri("/")
            .header(header::ACCEPT_ENCODING, "gzip")
            .body(Body::empty())
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

        let plain = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.router().oneshot(plain).await.unwrap();
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn gallery_lookup_by_id() {
        let app = TestApp::new(FakeDrive::new());
        let wedding = app.seed_gallery("Summer Wedding", "wed").await;
        let token = app.admin_token();

        let (status, body) = app
            .request(Method::GET, &format!("/api/galleries/{}", wedding.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "summer-wedding");

        let (status, body) = app.request(Method::GET, "/api/galleries/not-a-uuid", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid gallery id.");
        assert_eq!(body["code"], "BAD_REQUEST");

        let (status, body) = app
            .request(Method::GET, &format!("/api/galleries/{}", uuid::Uuid::new_v4()), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Gallery not found.");
    }

    #[tokio::test]
    async fn malformed_json_is_a_400() {
        let app = TestApp::new(FakeDrive::new());
        let response = app
            .request(Method::POST, "/api/auth/login", None, Some(json!("not an object")))
            .await;
        assert_eq!(response.0, StatusCode::BAD_REQUEST);
    }
}
