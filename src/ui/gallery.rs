use std::collections::HashMap;

use super::visibility::VisibilityRegistry;
use super::ToastKind;
use crate::database::models::{GalleryLink, SelectedPhoto};
use crate::services::helpers::{contact_field_errors, thumbnail_url};
use crate::services::listing::{PhotoDescriptor, PhotoPage};
use crate::services::session::{ClientSession, LoginAction};
use crate::services::submission::SelectionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    LoggedOut,
    GallerySelectionPending { galleries: Vec<GalleryLink> },
    Viewing,
    LightboxOpen { index: usize },
    SubmissionPending,
    Submitted,
}

/// Which outbound call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Login,
    Page,
    Submit,
}

#[derive(Debug, Clone)]
pub enum Command {
    Login { username: String, password: String },
    LoginSucceeded(ClientSession),
    OpenGallery { slug: String },
    /// The bottom-of-list sentinel scrolled into view
    SentinelVisible,
    PageLoaded { page: usize, result: PhotoPage },
    PhotoVisible { id: String },
    ToggleSelection { id: String },
    OpenLightbox { id: String },
    CloseLightbox,
    NextPhoto,
    PreviousPhoto,
    ToggleLightboxSelection,
    OpenSubmission,
    CancelSubmission,
    Submit { name: String, email: String, phone: String },
    SubmitSucceeded { message: String },
    RequestFailed { request: Request, status: Option<u16>, message: String },
    Logout,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Login { username: String, password: String },
    LoginError { message: String },
    StoreSession { token: String, client_name: String },
    Navigate { destination: String },
    ShowGalleryChoices { galleries: Vec<GalleryLink> },
    FetchPage { slug: String, page: usize, limit: usize },
    AppendPhotos { photos: Vec<PhotoDescriptor> },
    LoadImage { id: String, url: String },
    /// Every page has been fetched; the sentinel can go away
    PagingComplete,
    RenderSelection {
        selected: Vec<String>,
        count: usize,
        /// Present only while the lightbox is open
        lightbox_selected: Option<bool>,
    },
    ShowLightbox { index: usize, url: String },
    HideLightbox,
    ShowSubmissionForm { count: usize },
    HideSubmissionForm,
    FieldErrors(HashMap<String, String>),
    Submit(SelectionRequest),
    Toast { kind: ToastKind, message: String },
    ClearSession,
}

/// Client gallery view model: paging, lazy image loads, selection, lightbox and submit
#[derive(Debug, Clone)]
pub struct GallerySession {
    phase: Phase,
    token: Option<String>,
    client_name: Option<String>,
    slug: Option<String>,
    page_size: usize,
    lightbox_width: u32,
    current_page: usize,
    total_pages: usize,
    loading: bool,
    photos: Vec<PhotoDescriptor>,
    selection: Vec<SelectedPhoto>,
    images: VisibilityRegistry<String>,
}

impl Default for GallerySession {
    fn default() -> Self {
        Self::new(50, 1920)
    }
}

impl GallerySession {
    pub fn new(page_size: usize, lightbox_width: u32) -> Self {
        Self {
            phase: Phase::LoggedOut,
            token: None,
            client_name: None,
            slug: None,
            page_size: page_size.max(1),
            lightbox_width,
            current_page: 1,
            total_pages: 1,
            loading: false,
            photos: Vec::new(),
            selection: Vec::new(),
            images: VisibilityRegistry::new(),
        }
    }

    /// Resume with a token from an earlier login
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    pub fn photos(&self) -> &[PhotoDescriptor] {
        &self.photos
    }

    pub fn selection(&self) -> &[SelectedPhoto] {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|p| p.id == id)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.current_page <= self.total_pages
    }

    pub fn lightbox_index(&self) -> Option<usize> {
        match self.phase {
            Phase::LightboxOpen { index } => Some(index),
            _ => None,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::Login { username, password } => {
                if username.trim().is_empty() || password.trim().is_empty() {
                    return vec![Effect::LoginError {
                        message: "Username and password are required.".into(),
                    }];
                }
                vec![Effect::Login { username, password }]
            }
            Command::LoginSucceeded(session) => self.logged_in(session),
            Command::OpenGallery { slug } => self.open_gallery(slug),
            Command::SentinelVisible => self.request_next_page().into_iter().collect(),
            Command::PageLoaded { page, result } => self.page_loaded(page, result),
            Command::PhotoVisible { id } => {
                if !self.images.became_visible(&id) {
                    return vec![];
                }
                match self.photos.iter().find(|p| p.id == id) {
                    Some(photo) => vec![Effect::LoadImage { id, url: photo.url.clone() }],
                    None => vec![],
                }
            }
            Command::ToggleSelection { id } => self.toggle(&id),
            Command::OpenLightbox { id } => match self.photos.iter().position(|p| p.id == id) {
                Some(index) => self.show_lightbox(index),
                None => vec![],
            },
            Command::CloseLightbox => {
                if self.lightbox_index().is_none() {
                    return vec![];
                }
                self.phase = Phase::Viewing;
                vec![Effect::HideLightbox]
            }
            Command::NextPhoto => match self.lightbox_index() {
                Some(index) if !self.photos.is_empty() => self.show_lightbox((index + 1) % self.photos.len()),
                _ => vec![],
            },
            Command::PreviousPhoto => match self.lightbox_index() {
                Some(index) if !self.photos.is_empty() => {
                    let len = self.photos.len();
                    self.show_lightbox((index + len - 1) % len)
                }
                _ => vec![],
            },
            Command::ToggleLightboxSelection => match self.lightbox_index().and_then(|i| self.photos.get(i)) {
                Some(photo) => {
                    let id = photo.id.clone();
                    self.toggle(&id)
                }
                None => vec![],
            },
            Command::OpenSubmission => {
                if self.selection.is_empty() {
                    return vec![no_selection_toast()];
                }
                self.phase = Phase::SubmissionPending;
                vec![Effect::ShowSubmissionForm { count: self.selection.len() }]
            }
            Command::CancelSubmission => {
                if self.phase == Phase::SubmissionPending {
                    self.phase = Phase::Viewing;
                }
                vec![Effect::HideSubmissionForm]
            }
            Command::Submit { name, email, phone } => self.submit(name, email, phone),
            Command::SubmitSucceeded { message } => {
                self.phase = Phase::Submitted;
                self.selection.clear();
                vec![
                    Effect::HideSubmissionForm,
                    self.render_selection(),
                    Effect::Toast { kind: ToastKind::Success, message },
                ]
            }
            Command::RequestFailed { request, status, message } => self.failed(request, status, message),
            Command::Logout => self.logout(),
        }
    }

    fn logged_in(&mut self, session: ClientSession) -> Vec<Effect> {
        self.token = Some(session.token.clone());
        self.client_name = Some(session.client_name.clone());

        let mut effects = vec![
            Effect::StoreSession {
                token: session.token,
                client_name: session.client_name,
            },
            Effect::Toast {
                kind: ToastKind::Success,
                message: session.message,
            },
        ];
        match session.action {
            LoginAction::Redirect { destination } => effects.push(Effect::Navigate { destination }),
            LoginAction::Select { galleries } => {
                self.phase = Phase::GallerySelectionPending {
                    galleries: galleries.clone(),
                };
                effects.push(Effect::ShowGalleryChoices { galleries });
            }
        }
        effects
    }

    fn open_gallery(&mut self, slug: String) -> Vec<Effect> {
        if self.token.is_none() {
            self.phase = Phase::LoggedOut;
            return vec![];
        }
        self.slug = Some(slug);
        self.current_page = 1;
        self.total_pages = 1;
        self.loading = false;
        self.photos.clear();
        self.selection.clear();
        self.images.clear();
        self.phase = Phase::Viewing;
        self.request_next_page().into_iter().collect()
    }

    /// Single-flight: a second trigger while a page is outstanding does nothing
    fn request_next_page(&mut self) -> Option<Effect> {
        if self.loading || !self.has_more() {
            return None;
        }
        let slug = self.slug.clone()?;
        self.loading = true;
        Some(Effect::FetchPage {
            slug,
            page: self.current_page,
            limit: self.page_size,
        })
    }

    fn page_loaded(&mut self, page: usize, result: PhotoPage) -> Vec<Effect> {
        if !self.loading || page != self.current_page {
            return vec![];
        }
        self.loading = false;
        self.total_pages = result.total_pages;
        self.current_page += 1;

        for photo in &result.photos {
            self.images.observe(photo.id.clone());
        }
        self.photos.extend(result.photos.iter().cloned());

        let mut effects = vec![Effect::AppendPhotos { photos: result.photos }];
        if !self.has_more() {
            effects.push(Effect::PagingComplete);
        }
        effects
    }

    fn toggle(&mut self, id: &str) -> Vec<Effect> {
        if let Some(pos) = self.selection.iter().position(|p| p.id == id) {
            self.selection.remove(pos);
        } else {
            let Some(photo) = self.photos.iter().find(|p| p.id == id) else {
                return vec![];
            };
            self.selection.push(SelectedPhoto {
                id: photo.id.clone(),
                name: photo.name.clone(),
            });
        }
        vec![self.render_selection()]
    }

    fn show_lightbox(&mut self, index: usize) -> Vec<Effect> {
        self.phase = Phase::LightboxOpen { index };
        let url = thumbnail_url(&self.photos[index].id, self.lightbox_width);
        vec![Effect::ShowLightbox { index, url }, self.render_selection()]
    }

    fn render_selection(&self) -> Effect {
        let lightbox_selected = self
            .lightbox_index()
            .and_then(|i| self.photos.get(i))
            .map(|photo| self.is_selected(&photo.id));
        Effect::RenderSelection {
            selected: self.selection.iter().map(|p| p.id.clone()).collect(),
            count: self.selection.len(),
            lightbox_selected,
        }
    }

    fn submit(&mut self, name: String, email: String, phone: String) -> Vec<Effect> {
        if self.selection.is_empty() {
            return vec![no_selection_toast()];
        }
        let errors = contact_field_errors(&name, &email, &phone);
        if !errors.is_empty() {
            return vec![Effect::FieldErrors(errors)];
        }
        self.phase = Phase::SubmissionPending;
        vec![Effect::Submit(SelectionRequest {
            client_name: name.trim().to_string(),
            client_email: email.trim().to_string(),
            client_phone: phone.trim().to_string(),
            selected_photos: self.selection.clone(),
            gallery_slug: self.slug.clone(),
        })]
    }

    fn failed(&mut self, request: Request, status: Option<u16>, message: String) -> Vec<Effect> {
        if request == Request::Login {
            return vec![Effect::LoginError { message }];
        }
        if status == Some(401) {
            return self.logout();
        }
        if request == Request::Page {
            self.loading = false;
        }
        vec![Effect::Toast {
            kind: ToastKind::Error,
            message,
        }]
    }

    fn logout(&mut self) -> Vec<Effect> {
        *self = Self::new(self.page_size, self.lightbox_width);
        vec![Effect::ClearSession]
    }
}

fn no_selection_toast() -> Effect {
    Effect::Toast {
        kind: ToastKind::Error,
        message: "Please select at least one photo before submitting.".into(),
    }
}
