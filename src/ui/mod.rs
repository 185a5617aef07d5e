//! Headless view models for the gallery page and the admin dashboard.
//!
//! Each model takes a closed set of commands and returns the effects the
//! caller must perform (HTTP calls, rendering, navigation). Nothing here
//! does I/O, so a browser shell or the CLI can drive the same state machine.

pub mod dashboard;
pub mod gallery;
pub mod visibility;

pub use dashboard::DashboardModel;
pub use gallery::GallerySession;
pub use visibility::VisibilityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}
