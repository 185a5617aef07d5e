pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseManager, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{CredentialStore, DashboardStats, Page, PageQuery};
