pub mod admin;
pub mod drive;
pub mod gallery_access;
pub mod helpers;
pub mod listing;
pub mod notify;
pub mod session;
pub mod submission;

pub use drive::{DriveClient, DriveError, DriveFile, FileListingProvider};
pub use listing::{PhotoDescriptor, PhotoPage};
pub use notify::{LogNotifier, Notifier, TwilioNotifier};
