pub mod admin_user;
pub mod client;
pub mod contact;
pub mod gallery;
pub mod submission;

pub use admin_user::AdminUser;
pub use client::Client;
pub use contact::Contact;
pub use gallery::{Gallery, GalleryLink};
pub use submission::{SelectedPhoto, Submission};
