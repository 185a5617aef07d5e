// handlers/protected/mod.rs - Protected handlers (client JWT required)
//
// Middleware: client_auth_middleware inserts ClientUser into request extensions.

pub mod gallery;

pub use gallery::my_gallery_get;
