use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub listing: ListingConfig,
    pub drive: DriveConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: String,
    pub static_max_age_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub backend: StoreBackend,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    /// Admin account created at startup when missing
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAdmin {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub gallery_page_size: usize,
    pub admin_page_size: u64,
    pub upstream_cap: u32,
    pub thumbnail_width: u32,
    pub lightbox_width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub credentials_file: Option<String>,
    pub token_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub api_base: String,
    pub account_sid: Option<String>,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl NotifyConfig {
    /// All four Twilio settings are present
    pub fn is_complete(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.from.is_some() && self.to.is_some()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("GALLERY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("PUBLIC_DIR") {
            self.server.public_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => self.database.backend = StoreBackend::Memory,
            Ok("postgres") => self.database.backend = StoreBackend::Postgres,
            _ => {}
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let (Ok(username), Ok(password)) = (env::var("SEED_ADMIN_USERNAME"), env::var("SEED_ADMIN_PASSWORD")) {
            self.security.seed_admin = Some(SeedAdmin { username, password });
        }

        // Listing overrides
        if let Ok(v) = env::var("LISTING_PAGE_SIZE") {
            self.listing.gallery_page_size = v.parse().unwrap_or(self.listing.gallery_page_size);
        }
        if let Ok(v) = env::var("ADMIN_PAGE_SIZE") {
            self.listing.admin_page_size = v.parse().unwrap_or(self.listing.admin_page_size);
        }

        // Drive overrides
        if let Ok(v) = env::var("DRIVE_API_BASE") {
            self.drive.api_base = v;
        }
        if let Ok(v) = env::var("DRIVE_API_KEY") {
            self.drive.api_key = Some(v);
        }
        if let Ok(v) = env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            self.drive.credentials_file = Some(v);
        }

        // Notification overrides
        if let Ok(v) = env::var("TWILIO_API_BASE") {
            self.notify.api_base = v;
        }
        self.notify.account_sid = env::var("TWILIO_ACCOUNT_SID").ok().or(self.notify.account_sid);
        self.notify.auth_token = env::var("TWILIO_AUTH_TOKEN").ok().or(self.notify.auth_token);
        self.notify.from = env::var("TWILIO_WHATSAPP_NUMBER").ok().or(self.notify.from);
        self.notify.to = env::var("YOUR_WHATSAPP_NUMBER").ok().or(self.notify.to);

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_dir: "public".to_string(),
                static_max_age_secs: 7 * 24 * 60 * 60,
            },
            database: DatabaseConfig {
                url: None,
                backend: StoreBackend::Postgres,
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "development-only-secret".to_string(),
                jwt_expiry_hours: 8,
                bcrypt_cost: 10,
                cors_origins: vec![],
                seed_admin: None,
            },
            listing: ListingConfig::default(),
            drive: DriveConfig::default(),
            notify: NotifyConfig::default(),
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.security.jwt_secret = String::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 20;
        config.database.connection_timeout = 5;
        // Must come from JWT_SECRET
        config.security.jwt_secret = String::new();
        config
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            gallery_page_size: 50,
            admin_page_size: 10,
            upstream_cap: 1000,
            thumbnail_width: 400,
            lightbox_width: 1920,
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/drive/v3".to_string(),
            api_key: None,
            credentials_file: None,
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.twilio.com/2010-04-01".to_string(),
            account_sid: None,
            auth_token: None,
            from: None,
            to: None,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
