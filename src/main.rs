use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use client_gallery::app::{app, AppState};
use client_gallery::config;
use client_gallery::database::DatabaseManager;
use client_gallery::services::{admin, DriveClient, FileListingProvider, LogNotifier, Notifier, TwilioNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    tracing::info!("Starting Client Gallery in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store = DatabaseManager::open_store(&config.database)
        .await
        .context("failed to open credential store")?;
    tracing::info!("✅ Credential store ready ({:?})", config.database.backend);

    if let Some(seed) = &config.security.seed_admin {
        admin::ensure_admin(store.as_ref(), config.security.bcrypt_cost, &seed.username, &seed.password)
            .await
            .context("failed to seed admin account")?;
    }

    let files: Arc<dyn FileListingProvider> = Arc::new(DriveClient::from_config(&config.drive)?);
    let notifier: Arc<dyn Notifier> = match TwilioNotifier::from_config(&config.notify) {
        Some(twilio) => Arc::new(twilio),
        None => {
            tracing::warn!("Twilio credentials incomplete; selection notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        store,
        files,
        notifier,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("🚀 Client Gallery listening on http://{}", bind_addr);
    tracing::info!("🙍 Dashboard at http://{}/dashboard", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
