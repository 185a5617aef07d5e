// handlers/elevated/mod.rs - Elevated handlers (admin JWT required)
//
// Middleware: admin_auth_middleware inserts AdminUser into request extensions.
// Every list endpoint answers `{ data, total, page, totalPages }`.

pub mod admin;

pub use admin::*;
