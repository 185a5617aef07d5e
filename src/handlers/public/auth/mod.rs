// handlers/public/auth/mod.rs - Public authentication handlers

pub mod client_login; // POST /api/auth/client-login
pub mod login;        // POST /api/auth/login

pub use client_login::client_login_post;
pub use login::login_post;

use serde::Deserialize;

/// Credentials body shared by both login endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
