// handlers/protected/gallery/mod.rs - Client gallery handlers

pub mod my_gallery; // GET /api/my-gallery

pub use my_gallery::my_gallery_get;
