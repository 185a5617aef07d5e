use std::time::{Duration, Instant};

use uuid::Uuid;

use super::ToastKind;
use crate::database::models::{Client, Contact, Gallery, Submission};
use crate::database::{DashboardStats, Page};
use crate::services::admin::{ClientInput, GalleryInput};
use crate::services::session::AdminSession;

/// Typing in a search box waits this long before fetching
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Limit used to pull every gallery and client for dropdowns and checklists
pub const REFERENCE_LIMIT: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Galleries,
    Clients,
    Contacts,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Galleries, ListKind::Clients, ListKind::Contacts];

    fn index(self) -> usize {
        match self {
            ListKind::Galleries => 0,
            ListKind::Clients => 1,
            ListKind::Contacts => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Gallery(Uuid),
    Client(Uuid),
    Contact(Uuid),
}

#[derive(Debug, Clone)]
pub enum Mutation {
    CreateGallery(GalleryInput),
    CreateClient(ClientInput),
    UpdateClient { id: Uuid, input: ClientInput },
    AssignGalleries { client_id: Uuid, gallery_ids: Vec<Uuid> },
    Delete(DeleteTarget),
}

impl Mutation {
    /// Lists whose rows may have changed after this mutation
    fn affects(&self) -> &'static [ListKind] {
        match self {
            // Gallery changes show up in the clients' assignment column too
            Mutation::CreateGallery(_) | Mutation::Delete(DeleteTarget::Gallery(_)) => {
                &[ListKind::Galleries, ListKind::Clients]
            }
            Mutation::CreateClient(_)
            | Mutation::UpdateClient { .. }
            | Mutation::AssignGalleries { .. }
            | Mutation::Delete(DeleteTarget::Client(_)) => &[ListKind::Clients, ListKind::Galleries],
            Mutation::Delete(DeleteTarget::Contact(_)) => &[ListKind::Contacts],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Login { username: String, password: String },
    LoginSucceeded(AdminSession),
    StatsLoaded(DashboardStats),
    GalleriesLoaded(Page<Gallery>),
    ClientsLoaded(Page<Client>),
    ContactsLoaded(Page<Contact>),
    ReferencesLoaded { galleries: Vec<Gallery>, clients: Vec<Client> },
    SearchInput { kind: ListKind, text: String, at: Instant },
    Tick { now: Instant },
    NextPage(ListKind),
    PreviousPage(ListKind),
    CreateGallery(GalleryInput),
    CreateClient(ClientInput),
    UpdateClient { id: Uuid, input: ClientInput },
    EditAssignments { client_id: Uuid },
    ToggleAssignment { gallery_id: Uuid },
    SaveAssignments,
    CloseAssignments,
    RequestDelete(DeleteTarget),
    ConfirmDelete,
    CancelDelete,
    MutationSucceeded { message: String },
    ShareGallery { gallery_id: Uuid },
    ViewClient { client_id: Uuid },
    ViewSubmissions { email: String },
    SubmissionsLoaded { email: String, submissions: Vec<Submission> },
    RequestFailed { status: Option<u16>, message: String },
    Logout,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Login { username: String, password: String },
    LoginError { message: String },
    StoreSession { token: String, username: String },
    FetchStats,
    Fetch { kind: ListKind, request: ListRequest },
    FetchReferences,
    Render(ListKind),
    RenderStats(DashboardStats),
    Confirm { message: String },
    Mutate(Mutation),
    ShowAssignments { client_id: Uuid, items: Vec<AssignmentItem> },
    HideAssignments,
    /// Hand the link to a share sheet, or copy `path` joined to the page origin
    ShareLink { title: String, text: String, path: String },
    ShowClient { name: String, username: String, galleries: Vec<String> },
    FetchSubmissions { email: String },
    ShowSubmissions { email: String, submissions: Vec<Submission> },
    Toast { kind: ToastKind, message: String },
    ClearSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentItem {
    pub gallery_id: Uuid,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone)]
struct Panel {
    page: u64,
    total_pages: u64,
    search: String,
    search_due: Option<Instant>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            search: String::new(),
            search_due: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Assignments {
    client_id: Uuid,
    items: Vec<AssignmentItem>,
}

/// Admin dashboard view model: three paged lists, stats, deletes and gallery assignment
#[derive(Debug, Clone)]
pub struct DashboardModel {
    token: Option<String>,
    page_size: u64,
    panels: [Panel; 3],
    galleries: Vec<Gallery>,
    clients: Vec<Client>,
    contacts: Vec<Contact>,
    all_galleries: Vec<Gallery>,
    all_clients: Vec<Client>,
    stats: DashboardStats,
    pending_delete: Option<DeleteTarget>,
    pending_mutation: Option<Mutation>,
    assignments: Option<Assignments>,
}

impl Default for DashboardModel {
    fn default() -> Self {
        Self::new(10)
    }
}

impl DashboardModel {
    pub fn new(page_size: u64) -> Self {
        Self {
            token: None,
            page_size: page_size.max(1),
            panels: Default::default(),
            galleries: Vec::new(),
            clients: Vec::new(),
            contacts: Vec::new(),
            all_galleries: Vec::new(),
            all_clients: Vec::new(),
            stats: DashboardStats::default(),
            pending_delete: None,
            pending_mutation: None,
            assignments: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn page(&self, kind: ListKind) -> u64 {
        self.panels[kind.index()].page
    }

    pub fn search(&self, kind: ListKind) -> &str {
        &self.panels[kind.index()].search
    }

    pub fn galleries(&self) -> &[Gallery] {
        &self.galleries
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Name of the client a gallery is assigned to, for the galleries table
    pub fn gallery_owner(&self, gallery_id: Uuid) -> Option<&str> {
        self.all_clients
            .iter()
            .find(|c| c.has_gallery(gallery_id))
            .map(|c| c.name.as_str())
    }

    /// Gallery names assigned to a client, for the clients table
    pub fn client_gallery_names(&self, client: &Client) -> Vec<&str> {
        self.all_galleries
            .iter()
            .filter(|g| client.has_gallery(g.id))
            .map(|g| g.name.as_str())
            .collect()
    }

    pub fn assignment_items(&self) -> Option<&[AssignmentItem]> {
        self.assignments.as_ref().map(|a| a.items.as_slice())
    }

    /// Everything the dashboard loads on entry
    pub fn load_all(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::FetchStats];
        effects.extend(ListKind::ALL.iter().map(|kind| self.fetch(*kind)));
        effects.push(Effect::FetchReferences);
        effects
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
            Command::LoginSucceeded(session) => {
                self.token = Some(session.token.clone());
                let mut effects = vec![Effect::StoreSession {
                    token: session.token,
                    username: session.username,
                }];
                effects.extend(self.load_all());
                effects
            }
            Command::StatsLoaded(stats) => {
                self.stats = stats.clone();
                vec![Effect::RenderStats(stats)]
            }
            Command::GalleriesLoaded(page) => {
                self.record_page(ListKind::Galleries, &page);
                self.galleries = page.data;
                vec![Effect::Render(ListKind::Galleries)]
            }
            Command::ClientsLoaded(page) => {
                self.record_page(ListKind::Clients, &page);
                self.clients = page.data;
                vec![Effect::Render(ListKind::Clients)]
            }
            Command::ContactsLoaded(page) => {
                self.record_page(ListKind::Contacts, &page);
                self.contacts = page.data;
                vec![Effect::Render(ListKind::Contacts)]
            }
            Command::ReferencesLoaded { galleries, clients } => {
                self.all_galleries = galleries;
                self.all_clients = clients;
                vec![Effect::Render(ListKind::Galleries), Effect::Render(ListKind::Clients)]
            }
            Command::SearchInput { kind, text, at } => {
                let panel = &mut self.panels[kind.index()];
                panel.search = text;
                panel.search_due = Some(at + SEARCH_DEBOUNCE);
                vec![]
            }
            Command::Tick { now } => {
                let mut effects = Vec::new();
                for kind in ListKind::ALL {
                    let panel = &mut self.panels[kind.index()];
                    if panel.search_due.is_some_and(|due| due <= now) {
                        panel.search_due = None;
                        panel.page = 1;
                        effects.push(self.fetch(kind));
                    }
                }
                effects
            }
            Command::NextPage(kind) => {
                let panel = &mut self.panels[kind.index()];
                if panel.page >= panel.total_pages {
                    return vec![];
                }
                panel.page += 1;
                vec![self.fetch(kind)]
            }
            Command::PreviousPage(kind) => {
                let panel = &mut self.panels[kind.index()];
                if panel.page <= 1 {
                    return vec![];
                }
                panel.page -= 1;
                vec![self.fetch(kind)]
            }
            Command::CreateGallery(input) => {
                if input.name.trim().is_empty() || input.folder_link.trim().is_empty() {
                    return vec![error_toast("Gallery name and folder link are required.")];
                }
                self.mutate(Mutation::CreateGallery(input))
            }
            Command::CreateClient(input) => {
                let missing_password = input.password.as_deref().map_or(true, |p| p.is_empty());
                if input.name.trim().is_empty() || input.username.trim().is_empty() || missing_password {
                    return vec![error_toast("All fields are required.")];
                }
                self.mutate(Mutation::CreateClient(input))
            }
            Command::UpdateClient { id, input } => {
                if input.name.trim().is_empty() || input.username.trim().is_empty() {
                    return vec![error_toast("Name and username are required.")];
                }
                self.mutate(Mutation::UpdateClient { id, input })
            }
            Command::EditAssignments { client_id } => {
                let client = self
                    .all_clients
                    .iter()
                    .chain(self.clients.iter())
                    .find(|c| c.id == client_id);
                let Some(client) = client else {
                    return vec![error_toast("Client not found.")];
                };
                let items: Vec<AssignmentItem> = self
                    .all_galleries
                    .iter()
                    .map(|g| AssignmentItem {
                        gallery_id: g.id,
                        name: g.name.clone(),
                        checked: client.has_gallery(g.id),
                    })
                    .collect();
                self.assignments = Some(Assignments {
                    client_id,
                    items: items.clone(),
                });
                vec![Effect::ShowAssignments { client_id, items }]
            }
            Command::ToggleAssignment { gallery_id } => {
                let Some(assignments) = self.assignments.as_mut() else {
                    return vec![];
                };
                match assignments.items.iter_mut().find(|i| i.gallery_id == gallery_id) {
                    Some(item) => {
                        item.checked = !item.checked;
                        vec![Effect::ShowAssignments {
                            client_id: assignments.client_id,
                            items: assignments.items.clone(),
                        }]
                    }
                    None => vec![],
                }
            }
            Command::SaveAssignments => {
                let Some(assignments) = self.assignments.take() else {
                    return vec![];
                };
                let gallery_ids = assignments
                    .items
                    .iter()
                    .filter(|i| i.checked)
                    .map(|i| i.gallery_id)
                    .collect();
                let mut effects = vec![Effect::HideAssignments];
                effects.extend(self.mutate(Mutation::AssignGalleries {
                    client_id: assignments.client_id,
                    gallery_ids,
                }));
                effects
            }
            Command::CloseAssignments => {
                self.assignments = None;
                vec![Effect::HideAssignments]
            }
            Command::RequestDelete(target) => {
                self.pending_delete = Some(target);
                let message = match target {
                    DeleteTarget::Gallery(_) => "Delete this gallery? Clients assigned to it will lose access.",
                    DeleteTarget::Client(_) => "Delete this client? They will no longer be able to log in.",
                    DeleteTarget::Contact(_) => "Delete this contact?",
                };
                vec![Effect::Confirm {
                    message: message.into(),
                }]
            }
            Command::ConfirmDelete => match self.pending_delete.take() {
                Some(target) => self.mutate(Mutation::Delete(target)),
                None => vec![],
            },
            Command::CancelDelete => {
                self.pending_delete = None;
                vec![]
            }
            Command::MutationSucceeded { message } => {
                let mut effects = vec![Effect::Toast {
                    kind: ToastKind::Success,
                    message,
                }];
                if let Some(mutation) = self.pending_mutation.take() {
                    effects.extend(self.refresh_after(&mutation));
                }
                effects
            }
            Command::ShareGallery { gallery_id } => {
                let gallery = self
                    .all_galleries
                    .iter()
                    .chain(self.galleries.iter())
                    .find(|g| g.id == gallery_id);
                match gallery {
                    Some(g) => vec![Effect::ShareLink {
                        title: format!("Photo gallery: {}", g.name),
                        text: format!("View the \"{}\" photo gallery.", g.name),
                        path: format!("/gallery/{}", g.slug),
                    }],
                    None => vec![error_toast("Gallery not found. Please refresh.")],
                }
            }
            Command::ViewClient { client_id } => {
                let client = self
                    .all_clients
                    .iter()
                    .chain(self.clients.iter())
                    .find(|c| c.id == client_id);
                match client {
                    Some(c) => vec![Effect::ShowClient {
                        name: c.name.clone(),
                        username: c.username.clone(),
                        galleries: self.client_gallery_names(c).into_iter().map(str::to_string).collect(),
                    }],
                    None => vec![error_toast("Client data not found. Please refresh.")],
                }
            }
            Command::ViewSubmissions { email } => vec![Effect::FetchSubmissions { email }],
            Command::SubmissionsLoaded { email, submissions } => {
                vec![Effect::ShowSubmissions { email, submissions }]
            }
            Command::RequestFailed { status, message } => {
                if status == Some(401) {
                    return self.logout();
                }
                self.pending_mutation = None;
                vec![error_toast(&message)]
            }
            Command::Logout => self.logout(),
        }
    }

    fn fetch(&self, kind: ListKind) -> Effect {
        let panel = &self.panels[kind.index()];
        let search = panel.search.trim();
        Effect::Fetch {
            kind,
            request: ListRequest {
                page: panel.page,
                limit: self.page_size,
                search: (!search.is_empty()).then(|| search.to_string()),
            },
        }
    }

    fn record_page<T>(&mut self, kind: ListKind, page: &Page<T>) {
        let panel = &mut self.panels[kind.index()];
        panel.page = page.page.max(1);
        panel.total_pages = page.total_pages.max(1);
    }

    fn mutate(&mut self, mutation: Mutation) -> Vec<Effect> {
        self.pending_mutation = Some(mutation.clone());
        vec![Effect::Mutate(mutation)]
    }

    /// Affected lists on their current page, then stats and cross-reference data
    fn refresh_after(&self, mutation: &Mutation) -> Vec<Effect> {
        let mut effects: Vec<Effect> = mutation.affects().iter().map(|kind| self.fetch(*kind)).collect();
        effects.push(Effect::FetchStats);
        effects.push(Effect::FetchReferences);
        effects
    }

    fn logout(&mut self) -> Vec<Effect> {
        *self = Self::new(self.page_size);
        vec![Effect::ClearSession]
    }
}

fn error_toast(message: &str) -> Effect {
    Effect::Toast {
        kind: ToastKind::Error,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn gallery(name: &str) -> Gallery {
        Gallery {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            folder_id: "folder".into(),
            created_at: Utc::now(),
        }
    }

    fn client(name: &str, gallery_ids: Vec<Uuid>) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: name.into(),
            username: name.to_lowercase(),
            password_hash: String::new(),
            gallery_ids,
            created_at: Utc::now(),
        }
    }

    fn page<T>(data: Vec<T>, page: u64, total_pages: u64) -> Page<T> {
        Page {
            total: data.len() as u64,
            data,
            page,
            total_pages,
        }
    }

    fn fetches(effects: &[Effect]) -> Vec<(ListKind, ListRequest)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Fetch { kind, request } => Some((*kind, request.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn login_loads_every_panel() {
        let mut model = DashboardModel::default();
        let effects = model.dispatch(Command::LoginSucceeded(AdminSession {
            message: "Admin login successful".into(),
            token: "tok".into(),
            username: "admin".into(),
        }));
        assert_eq!(model.token(), Some("tok"));
        assert_eq!(fetches(&effects).len(), 3);
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchStats)));
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchReferences)));
    }

    #[test]
    fn search_is_debounced_and_resets_the_page() {
        let mut model = DashboardModel::new(10).with_token("t");
        model.dispatch(Command::ClientsLoaded(page(vec![], 3, 5)));
        assert_eq!(model.page(ListKind::Clients), 3);

        let start = Instant::now();
        assert!(model
            .dispatch(Command::SearchInput { kind: ListKind::Clients, text: "an".into(), at: start })
            .is_empty());
        let later = start + Duration::from_millis(200);
        model.dispatch(Command::SearchInput { kind: ListKind::Clients, text: "ann".into(), at: later });

        assert!(model.dispatch(Command::Tick { now: start + SEARCH_DEBOUNCE }).is_empty());

        let effects = model.dispatch(Command::Tick { now: later + SEARCH_DEBOUNCE });
        let requested = fetches(&effects);
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].0, ListKind::Clients);
        assert_eq!(requested[0].1, ListRequest { page: 1, limit: 10, search: Some("ann".into()) });

        assert!(model.dispatch(Command::Tick { now: later + SEARCH_DEBOUNCE * 2 }).is_empty());
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut model = DashboardModel::new(10).with_token("t");
        model.dispatch(Command::GalleriesLoaded(page(vec![gallery("A")], 1, 2)));
        assert!(model.dispatch(Command::PreviousPage(ListKind::Galleries)).is_empty());
        let effects = model.dispatch(Command::NextPage(ListKind::Galleries));
        assert_eq!(fetches(&effects)[0].1.page, 2);
        assert!(model.dispatch(Command::NextPage(ListKind::Galleries)).is_empty());
    }

    #[test]
    fn delete_requires_confirmation_and_refreshes() {
        let mut model = DashboardModel::new(10).with_token("t");
        let id = Uuid::new_v4();
        let effects = model.dispatch(Command::RequestDelete(DeleteTarget::Gallery(id)));
        assert!(matches!(effects.as_slice(), [Effect::Confirm { .. }]));

        model.dispatch(Command::CancelDelete);
        assert!(model.dispatch(Command::ConfirmDelete).is_empty());

        model.dispatch(Command::RequestDelete(DeleteTarget::Gallery(id)));
        let effects = model.dispatch(Command::ConfirmDelete);
        assert!(matches!(effects.as_slice(), [Effect::Mutate(Mutation::Delete(DeleteTarget::Gallery(g)))] if *g == id));

        let effects = model.dispatch(Command::MutationSucceeded { message: "Gallery deleted successfully.".into() });
        let kinds: Vec<_> = fetches(&effects).into_iter().map(|(k, _)| k).collect();
        assert!(kinds.contains(&ListKind::Galleries));
        assert!(kinds.contains(&ListKind::Clients));
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchStats)));
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchReferences)));
    }

    #[test]
    fn assignment_checklist_submits_the_full_set() {
        let a = gallery("A");
        let b = gallery("B");
        let c = gallery("C");
        let ann = client("Ann", vec![a.id, c.id]);
        let ann_id = ann.id;

        let mut model = DashboardModel::new(10).with_token("t");
        model.dispatch(Command::ReferencesLoaded {
            galleries: vec![a.clone(), b.clone(), c.clone()],
            clients: vec![ann],
        });
        assert_eq!(model.gallery_owner(c.id), Some("Ann"));
        assert_eq!(model.gallery_owner(b.id), None);

        model.dispatch(Command::EditAssignments { client_id: ann_id });
        let checked: Vec<bool> = model.assignment_items().unwrap_or_default().iter().map(|i| i.checked).collect();
        assert_eq!(checked, vec![true, false, true]);

        model.dispatch(Command::ToggleAssignment { gallery_id: a.id });
        model.dispatch(Command::ToggleAssignment { gallery_id: b.id });
        let effects = model.dispatch(Command::SaveAssignments);
        let Some(Effect::Mutate(Mutation::AssignGalleries { client_id, gallery_ids })) =
            effects.into_iter().find(|e| matches!(e, Effect::Mutate(_)))
        else {
            panic!("expected assignment mutation");
        };
        assert_eq!(client_id, ann_id);
        assert_eq!(gallery_ids, vec![b.id, c.id]);
    }

    #[test]
    fn share_links_point_at_the_gallery_page() {
        let wedding = gallery("Wedding");
        let mut model = DashboardModel::new(10).with_token("t");
        model.dispatch(Command::GalleriesLoaded(page(vec![wedding.clone()], 1, 1)));

        let effects = model.dispatch(Command::ShareGallery { gallery_id: wedding.id });
        assert!(matches!(
            effects.as_slice(),
            [Effect::ShareLink { title, path, .. }] if title == "Photo gallery: Wedding" && path == "/gallery/wedding"
        ));

        let effects = model.dispatch(Command::ShareGallery { gallery_id: Uuid::new_v4() });
        assert!(matches!(effects.as_slice(), [Effect::Toast { kind: ToastKind::Error, .. }]));
    }

    #[test]
    fn viewing_a_client_lists_assigned_gallery_names() {
        let a = gallery("A");
        let b = gallery("B");
        let ann = client("Ann", vec![b.id]);
        let bob = client("Bob", vec![]);
        let (ann_id, bob_id) = (ann.id, bob.id);

        let mut model = DashboardModel::new(10).with_token("t");
        model.dispatch(Command::ReferencesLoaded {
            galleries: vec![a, b],
            clients: vec![ann, bob],
        });

        let effects = model.dispatch(Command::ViewClient { client_id: ann_id });
        let [Effect::ShowClient { name, username, galleries }] = effects.as_slice() else {
            panic!("expected client details, got {:?}", effects);
        };
        assert_eq!((name.as_str(), username.as_str()), ("Ann", "ann"));
        assert_eq!(galleries, &vec!["B".to_string()]);

        let effects = model.dispatch(Command::ViewClient { client_id: bob_id });
        assert!(matches!(effects.as_slice(), [Effect::ShowClient { galleries, .. }] if galleries.is_empty()));

        let effects = model.dispatch(Command::ViewClient { client_id: Uuid::new_v4() });
        assert!(matches!(effects.as_slice(), [Effect::Toast { kind: ToastKind::Error, .. }]));
    }

    #[test]
    fn incomplete_forms_are_rejected_locally() {
        let mut model = DashboardModel::new(10).with_token("t");
        let effects = model.dispatch(Command::CreateClient(ClientInput {
            name: "Ann".into(),
            username: "ann".into(),
            password: None,
        }));
        assert!(matches!(effects.as_slice(), [Effect::Toast { kind: ToastKind::Error, .. }]));
        let effects = model.dispatch(Command::CreateGallery(GalleryInput::default()));
        assert!(matches!(effects.as_slice(), [Effect::Toast { kind: ToastKind::Error, .. }]));
    }

    #[test]
    fn unauthorized_response_logs_out() {
        let mut model = DashboardModel::new(10).with_token("t");
        let effects = model.dispatch(Command::RequestFailed {
            status: Some(401),
            message: "Admin authentication failed.".into(),
        });
        assert!(matches!(effects.as_slice(), [Effect::ClearSession]));
        assert!(model.token().is_none());
    }
}
