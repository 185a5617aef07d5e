use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::{config, StoreBackend};
use crate::database::DatabaseManager;
use crate::services::admin;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create tables and indexes in DATABASE_URL")]
    Migrate,

    #[command(about = "Create an admin account (no HTTP endpoint exists for this)")]
    CreateAdmin {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (falls back to GALLERY_PASSWORD)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = config();

    match cmd {
        DbCommands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Schema is up to date", None)
        }
        DbCommands::CreateAdmin { username, password } => {
            if config.database.backend == StoreBackend::Memory {
                anyhow::bail!("STORE_BACKEND=memory keeps nothing between runs; point DATABASE_URL at Postgres");
            }
            let password = resolve_password(password)?;
            let store = DatabaseManager::open_store(&config.database).await?;
            let created = admin::ensure_admin(store.as_ref(), config.security.bcrypt_cost, &username, &password).await?;
            if created {
                output_success(
                    &output_format,
                    &format!("Admin '{}' created", username),
                    Some(json!({ "username": username })),
                )
            } else {
                output_error(&output_format, &format!("Admin '{}' already exists", username), Some("DUPLICATE"))
            }
        }
    }
}
