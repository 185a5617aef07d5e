use clap::{Subcommand, ValueEnum};
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use uuid::Uuid;

use crate::api_client::{ApiClient, ClientError};
use crate::cli::config::{load_session_config, save_session_config, SessionConfig, StoredToken};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::admin::{ClientInput, GalleryInput};
use crate::ui::dashboard::{
    Command, DashboardModel, DeleteTarget, Effect, ListKind, ListRequest, Mutation, REFERENCE_LIMIT, SEARCH_DEBOUNCE,
};
use crate::ui::ToastKind;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListArg {
    Galleries,
    Clients,
    Contacts,
}

impl From<ListArg> for ListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Galleries => ListKind::Galleries,
            ListArg::Clients => ListKind::Clients,
            ListArg::Contacts => ListKind::Contacts,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecordArg {
    Gallery,
    Client,
    Contact,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Log in with admin credentials")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (falls back to GALLERY_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved admin token")]
    Logout,

    #[command(about = "Show dashboard statistics")]
    Stats,

    #[command(about = "List galleries, clients or contacts")]
    List {
        #[arg(value_enum)]
        kind: ListArg,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        search: Option<String>,
    },

    #[command(about = "Create a gallery from a Google Drive folder link")]
    CreateGallery {
        #[arg(long)]
        name: String,
        #[arg(long)]
        folder_link: String,
        #[arg(long, help = "Assign the new gallery to this client")]
        client_id: Option<String>,
    },

    #[command(about = "Create a client account")]
    CreateClient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    #[command(about = "Update a client's name, username and optionally password")]
    UpdateClient {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
    },

    #[command(about = "Replace a client's gallery assignments")]
    Assign {
        client_id: Uuid,
        #[arg(help = "Gallery ids; none clears every assignment")]
        gallery_ids: Vec<Uuid>,
    },

    #[command(about = "Delete a gallery, client or contact")]
    Delete {
        #[arg(value_enum)]
        kind: RecordArg,
        id: Uuid,
        #[arg(long, help = "Skip the confirmation")]
        yes: bool,
    },

    #[command(about = "Print a gallery's shareable link")]
    Share { gallery_id: Uuid },

    #[command(about = "Show a client and their assigned galleries")]
    ShowClient { client_id: Uuid },

    #[command(about = "Show submission history for an email")]
    Submissions { email: String },
}

pub async fn handle(cmd: AdminCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = load_session_config()?;
    let server = config.server_url(server);

    match cmd {
        AdminCommands::Login { username, password } => {
            let password = resolve_password(password)?;
            config.server = Some(server.clone());
            let mut driver = Driver::new(DashboardModel::default(), &server, config, &output_format)?;
            driver.quiet = true;
            let effects = driver.model.dispatch(Command::Login { username, password });
            driver.run(effects).await?;
            output_success(&output_format, "Admin login successful", None)
        }
        AdminCommands::Logout => {
            config.admin = None;
            save_session_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        AdminCommands::Stats => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.run(vec![Effect::FetchStats]).await?;
            let stats = driver.model.stats();
            output_rows(
                &output_format,
                stats,
                vec![
                    format!("Galleries:            {}", stats.total_galleries),
                    format!("Clients:              {}", stats.total_clients),
                    format!("Selections:           {}", stats.total_selections),
                    format!("Unassigned galleries: {}", stats.unassigned_galleries),
                ],
            )
        }
        AdminCommands::List { kind, page, search } => {
            let kind = ListKind::from(kind);
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.run(vec![Effect::FetchReferences]).await?;

            let effects = match search {
                Some(text) => {
                    let at = Instant::now();
                    driver.model.dispatch(Command::SearchInput { kind, text, at });
                    driver.model.dispatch(Command::Tick { now: at + SEARCH_DEBOUNCE })
                }
                None => vec![driver.fetch_first(kind)],
            };
            driver.run(effects).await?;
            while driver.model.page(kind) < page {
                let effects = driver.model.dispatch(Command::NextPage(kind));
                if effects.is_empty() {
                    break;
                }
                driver.run(effects).await?;
            }
            driver.print_list(kind)
        }
        AdminCommands::CreateGallery {
            name,
            folder_link,
            client_id,
        } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            let effects = driver.model.dispatch(Command::CreateGallery(GalleryInput {
                name,
                folder_link,
                client_id,
            }));
            driver.run(effects).await
        }
        AdminCommands::CreateClient { name, username, password } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            let effects = driver.model.dispatch(Command::CreateClient(ClientInput {
                name,
                username,
                password: Some(password),
            }));
            driver.run(effects).await
        }
        AdminCommands::UpdateClient {
            id,
            name,
            username,
            password,
        } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            let input = ClientInput { name, username, password };
            let effects = driver.model.dispatch(Command::UpdateClient { id, input });
            driver.run(effects).await
        }
        AdminCommands::Assign { client_id, gallery_ids } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.run(vec![Effect::FetchReferences]).await?;
            let effects = driver.model.dispatch(Command::EditAssignments { client_id });
            driver.run(effects).await?;

            let wanted: HashSet<Uuid> = gallery_ids.into_iter().collect();
            let known: HashSet<Uuid> = driver
                .model
                .assignment_items()
                .unwrap_or_default()
                .iter()
                .map(|item| item.gallery_id)
                .collect();
            if let Some(unknown) = wanted.iter().find(|id| !known.contains(id)) {
                anyhow::bail!("Gallery '{}' not found", unknown);
            }

            let toggles: Vec<Uuid> = driver
                .model
                .assignment_items()
                .unwrap_or_default()
                .iter()
                .filter(|item| item.checked != wanted.contains(&item.gallery_id))
                .map(|item| item.gallery_id)
                .collect();
            for gallery_id in toggles {
                driver.model.dispatch(Command::ToggleAssignment { gallery_id });
            }
            let effects = driver.model.dispatch(Command::SaveAssignments);
            driver.run(effects).await
        }
        AdminCommands::Delete { kind, id, yes } => {
            let target = match kind {
                RecordArg::Gallery => DeleteTarget::Gallery(id),
                RecordArg::Client => DeleteTarget::Client(id),
                RecordArg::Contact => DeleteTarget::Contact(id),
            };
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.confirm = yes;
            let effects = driver.model.dispatch(Command::RequestDelete(target));
            driver.run(effects).await
        }
        AdminCommands::Share { gallery_id } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.run(vec![Effect::FetchReferences]).await?;
            let effects = driver.model.dispatch(Command::ShareGallery { gallery_id });
            driver.run(effects).await
        }
        AdminCommands::ShowClient { client_id } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            driver.run(vec![Effect::FetchReferences]).await?;
            let effects = driver.model.dispatch(Command::ViewClient { client_id });
            driver.run(effects).await
        }
        AdminCommands::Submissions { email } => {
            let mut driver = Driver::authenticated(&server, config, &output_format)?;
            let effects = driver.model.dispatch(Command::ViewSubmissions { email });
            driver.run(effects).await
        }
    }
}

/// Performs a dashboard model's effects against the API until the queue drains
struct Driver<'a> {
    model: DashboardModel,
    api: ApiClient,
    /// Base for share links
    origin: String,
    config: SessionConfig,
    output: &'a OutputFormat,
    /// Answer confirmation prompts with yes
    confirm: bool,
    /// Suppress success toasts and list refreshes
    quiet: bool,
}

impl<'a> Driver<'a> {
    fn new(model: DashboardModel, server: &str, config: SessionConfig, output: &'a OutputFormat) -> anyhow::Result<Self> {
        Ok(Self {
            model,
            api: ApiClient::new(server)?,
            origin: server.trim_end_matches('/').to_string(),
            config,
            output,
            confirm: false,
            quiet: false,
        })
    }

    fn authenticated(server: &str, config: SessionConfig, output: &'a OutputFormat) -> anyhow::Result<Self> {
        let Some(stored) = config.admin.clone() else {
            anyhow::bail!("Not logged in. Run `gallery-cli admin login <username>` first");
        };
        let model = DashboardModel::new(crate::config::ListingConfig::default().admin_page_size).with_token(stored.token.clone());
        let mut driver = Self::new(model, server, config, output)?;
        driver.api.set_token(Some(stored.token));
        Ok(driver)
    }

    fn fetch_first(&self, kind: ListKind) -> Effect {
        Effect::Fetch {
            kind,
            request: ListRequest {
                page: 1,
                limit: self.model.page_size(),
                search: None,
            },
        }
    }

    async fn run(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            if let Some(command) = self.perform(effect).await? {
                queue.extend(self.model.dispatch(command));
            }
        }
        Ok(())
    }

    async fn perform(&mut self, effect: Effect) -> anyhow::Result<Option<Command>> {
        let command = match effect {
            Effect::Login { username, password } => Some(match self.api.admin_login(&username, &password).await {
                Ok(session) => Command::LoginSucceeded(session),
                Err(e) => anyhow::bail!(e.message()),
            }),
            Effect::LoginError { message } => anyhow::bail!(message),
            Effect::StoreSession { token, username } => {
                self.api.set_token(Some(token.clone()));
                self.config.admin = Some(StoredToken::new(token, username));
                save_session_config(&self.config)?;
                None
            }
            Effect::FetchStats => Some(match self.api.dashboard_stats().await {
                Ok(stats) => Command::StatsLoaded(stats),
                Err(e) => failed(e),
            }),
            Effect::Fetch { kind, request } => Some(self.fetch(kind, &request).await),
            Effect::FetchReferences => {
                let request = ListRequest {
                    page: 1,
                    limit: REFERENCE_LIMIT,
                    search: None,
                };
                let (galleries, clients) = futures::join!(self.api.galleries(&request), self.api.clients(&request));
                Some(match (galleries, clients) {
                    (Ok(galleries), Ok(clients)) => Command::ReferencesLoaded {
                        galleries: galleries.data,
                        clients: clients.data,
                    },
                    (Err(e), _) | (_, Err(e)) => failed(e),
                })
            }
            Effect::Confirm { message } => {
                if !self.confirm {
                    output_error(self.output, &format!("{} Re-run with --yes to confirm.", message), None)?;
                    return Ok(Some(Command::CancelDelete));
                }
                Some(Command::ConfirmDelete)
            }
            Effect::Mutate(mutation) => Some(match self.mutate(&mutation).await {
                Ok(message) => Command::MutationSucceeded { message },
                Err(e) => failed(e),
            }),
            Effect::ShareLink { title, path, .. } => {
                let url = format!("{}{}", self.origin, path);
                output_success(self.output, &format!("{}: {}", title, url), Some(json!({ "url": url })))?;
                None
            }
            Effect::ShowClient { name, username, galleries } => {
                let mut rows = vec![format!("Name:      {}", name), format!("Username:  {}", username)];
                if galleries.is_empty() {
                    rows.push("No galleries assigned.".to_string());
                } else {
                    rows.extend(galleries.iter().map(|g| format!("Gallery:   {}", g)));
                }
                output_rows(
                    self.output,
                    &json!({ "name": name, "username": username, "galleries": galleries }),
                    rows,
                )?;
                None
            }
            Effect::FetchSubmissions { email } => Some(match self.api.submissions(&email).await {
                Ok(submissions) => Command::SubmissionsLoaded { email, submissions },
                Err(e) => failed(e),
            }),
            Effect::ShowSubmissions { email, submissions } => {
                let rows = if submissions.is_empty() {
                    vec![format!("No submissions for {}", email)]
                } else {
                    submissions
                        .iter()
                        .map(|s| {
                            format!(
                                "{}  {} photo(s)  {}",
                                s.submitted_at.format("%Y-%m-%d %H:%M"),
                                s.selected_photos.len(),
                                s.gallery_slug.as_deref().unwrap_or("-")
                            )
                        })
                        .collect()
                };
                output_rows(self.output, &submissions, rows)?;
                None
            }
            Effect::Toast { kind, message } => {
                if kind == ToastKind::Error {
                    anyhow::bail!(message);
                }
                if !self.quiet {
                    output_toast(self.output, kind, &message)?;
                }
                None
            }
            Effect::ClearSession => {
                self.config.admin = None;
                save_session_config(&self.config)?;
                anyhow::bail!("Session expired or invalid. Please log in again.")
            }
            // The CLI prints once the queue drains; refreshed lists only matter to a live dashboard
            Effect::Render(_) | Effect::RenderStats(_) | Effect::ShowAssignments { .. } | Effect::HideAssignments => None,
        };
        Ok(command)
    }

    async fn fetch(&self, kind: ListKind, request: &ListRequest) -> Command {
        let result = match kind {
            ListKind::Galleries => self.api.galleries(request).await.map(Command::GalleriesLoaded),
            ListKind::Clients => self.api.clients(request).await.map(Command::ClientsLoaded),
            ListKind::Contacts => self.api.contacts(request).await.map(Command::ContactsLoaded),
        };
        result.unwrap_or_else(failed)
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<String, ClientError> {
        let body = match mutation {
            Mutation::CreateGallery(input) => self.api.create_gallery(input).await?,
            Mutation::CreateClient(input) => self.api.create_client(input).await?,
            Mutation::UpdateClient { id, input } => self.api.update_client(*id, input).await?,
            Mutation::AssignGalleries { client_id, gallery_ids } => self.api.assign_galleries(*client_id, gallery_ids).await?,
            Mutation::Delete(DeleteTarget::Gallery(id)) => self.api.delete_gallery(*id).await?,
            Mutation::Delete(DeleteTarget::Client(id)) => self.api.delete_client(*id).await?,
            Mutation::Delete(DeleteTarget::Contact(id)) => self.api.delete_contact(*id).await?,
        };
        Ok(body.message)
    }

    fn print_list(&self, kind: ListKind) -> anyhow::Result<()> {
        let page = self.model.page(kind);
        match kind {
            ListKind::Galleries => {
                let galleries = self.model.galleries();
                if galleries.is_empty() {
                    return output_empty_collection(self.output, "galleries", "No galleries found");
                }
                let rows = galleries
                    .iter()
                    .map(|g| {
                        let owner = self.model.gallery_owner(g.id).unwrap_or("Unassigned");
                        format!("{}  {}  /gallery/{}  {}", g.id, g.name, g.slug, owner)
                    })
                    .collect();
                output_rows(self.output, &json!({ "data": galleries, "page": page }), rows)
            }
            ListKind::Clients => {
                let clients = self.model.clients();
                if clients.is_empty() {
                    return output_empty_collection(self.output, "clients", "No clients found");
                }
                let rows = clients
                    .iter()
                    .map(|c| {
                        let names = self.model.client_gallery_names(c);
                        let galleries = if names.is_empty() { "None".to_string() } else { names.join(", ") };
                        format!("{}  {}  {}  {}", c.id, c.name, c.username, galleries)
                    })
                    .collect();
                output_rows(self.output, &json!({ "data": clients, "page": page }), rows)
            }
            ListKind::Contacts => {
                let contacts = self.model.contacts();
                if contacts.is_empty() {
                    return output_empty_collection(self.output, "contacts", "No contacts found");
                }
                let rows = contacts
                    .iter()
                    .map(|c| format!("{}  {}  {}  {}", c.id, c.name, c.email, c.phone))
                    .collect();
                output_rows(self.output, &json!({ "data": contacts, "page": page }), rows)
            }
        }
    }
}

fn failed(error: ClientError) -> Command {
    Command::RequestFailed {
        status: error.status(),
        message: error.message(),
    }
}
