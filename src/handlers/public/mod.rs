// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and the client's final selection submit.

pub mod auth;
pub mod submit;

pub use submit::submit_post;
