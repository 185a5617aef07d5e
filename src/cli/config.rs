use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    /// Admin username or client display name
    pub name: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(token: String, name: String) -> Self {
        Self {
            token,
            name,
            saved_at: Utc::now(),
        }
    }
}

/// Persisted CLI state, one file per config directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub server: Option<String>,
    pub admin: Option<StoredToken>,
    pub client: Option<StoredToken>,
}

impl SessionConfig {
    /// `--server`, then the saved server, then `GALLERY_SERVER`, then localhost
    pub fn server_url(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.server.clone())
            .or_else(|| std::env::var("GALLERY_SERVER").ok())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("GALLERY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("gallery").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session_config() -> anyhow::Result<SessionConfig> {
    let session_file = get_config_dir()?.join("session.json");

    if !session_file.exists() {
        return Ok(SessionConfig::default());
    }

    let content = fs::read_to_string(session_file)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_session_config(config: &SessionConfig) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(session_file, content)?;
    Ok(())
}
