pub mod auth;
pub mod response;

pub use auth::{admin_auth_middleware, client_auth_middleware, AdminUser, ClientUser};
pub use response::{ApiResponse, ApiResult, Message};
