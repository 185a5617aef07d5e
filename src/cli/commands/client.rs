use clap::Subcommand;
use serde_json::json;
use std::collections::VecDeque;

use crate::api_client::{ApiClient, ClientError};
use crate::cli::config::{load_session_config, save_session_config, SessionConfig, StoredToken};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::ui::gallery::{Command, Effect, GallerySession, Request};
use crate::ui::ToastKind;

#[derive(Subcommand)]
pub enum ClientCommands {
    #[command(about = "Log in with client credentials")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (falls back to GALLERY_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved client token")]
    Logout,

    #[command(about = "List photos in a gallery")]
    Browse {
        #[arg(help = "Gallery slug")]
        slug: String,
        #[arg(long, default_value_t = 1, help = "Number of pages to fetch")]
        pages: usize,
        #[arg(long, help = "Fetch every page")]
        all: bool,
        #[arg(long, default_value_t = 50, help = "Photos per page")]
        limit: usize,
    },

    #[command(about = "Submit a selection of photos")]
    Submit {
        #[arg(help = "Gallery slug")]
        slug: String,
        #[arg(long = "photo", required = true, help = "Photo id to select (repeatable)")]
        photos: Vec<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
}

pub async fn handle(cmd: ClientCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = load_session_config()?;
    let server = config.server_url(server);

    match cmd {
        ClientCommands::Login { username, password } => {
            let password = resolve_password(password)?;
            config.server = Some(server.clone());
            let mut driver = Driver::new(GallerySession::default(), &server, config, &output_format)?;
            let effects = driver.session.dispatch(Command::Login { username, password });
            driver.run(effects).await
        }
        ClientCommands::Logout => {
            config.client = None;
            save_session_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        ClientCommands::Browse {
            slug,
            pages,
            all,
            limit,
        } => {
            let mut driver = Driver::authenticated(limit, &server, config, &output_format)?;
            driver.open(slug, if all { usize::MAX } else { pages.max(1) }).await?;

            let photos = driver.session.photos();
            let rows = driver.loaded.iter().map(|(id, url)| format!("{}  {}", id, url)).collect();
            output_rows(
                &output_format,
                &json!({
                    "photos": photos,
                    "loadedPages": driver.session.current_page() - 1,
                    "totalPages": driver.session.total_pages(),
                }),
                rows,
            )
        }
        ClientCommands::Submit {
            slug,
            photos,
            name,
            email,
            phone,
        } => {
            let mut driver = Driver::authenticated(50, &server, config, &output_format)?;
            driver.open(slug, usize::MAX).await?;

            for id in photos {
                if !driver.session.photos().iter().any(|p| p.id == id) {
                    anyhow::bail!("Photo '{}' is not in this gallery", id);
                }
                if !driver.session.is_selected(&id) {
                    let effects = driver.session.dispatch(Command::ToggleSelection { id });
                    driver.run(effects).await?;
                }
            }

            let effects = driver.session.dispatch(Command::OpenSubmission);
            driver.run(effects).await?;
            let effects = driver.session.dispatch(Command::Submit { name, email, phone });
            driver.run(effects).await
        }
    }
}

/// Performs a gallery session's effects against the API until the queue drains
struct Driver<'a> {
    session: GallerySession,
    api: ApiClient,
    config: SessionConfig,
    output: &'a OutputFormat,
    complete: bool,
    loaded: Vec<(String, String)>,
}

impl<'a> Driver<'a> {
    fn new(session: GallerySession, server: &str, config: SessionConfig, output: &'a OutputFormat) -> anyhow::Result<Self> {
        Ok(Self {
            session,
            api: ApiClient::new(server)?,
            config,
            output,
            complete: false,
            loaded: Vec::new(),
        })
    }

    fn authenticated(limit: usize, server: &str, config: SessionConfig, output: &'a OutputFormat) -> anyhow::Result<Self> {
        let Some(stored) = config.client.clone() else {
            anyhow::bail!("Not logged in. Run `gallery-cli client login <username>` first");
        };
        let session = GallerySession::new(limit, crate::config::ListingConfig::default().lightbox_width)
            .with_token(stored.token.clone());
        let mut driver = Self::new(session, server, config, output)?;
        driver.api.set_token(Some(stored.token));
        Ok(driver)
    }

    /// Open the gallery and keep triggering the sentinel until `pages` pages are in
    async fn open(&mut self, slug: String, pages: usize) -> anyhow::Result<()> {
        let effects = self.session.dispatch(Command::OpenGallery { slug });
        self.run(effects).await?;

        let mut fetched = 1;
        while !self.complete && fetched < pages {
            let effects = self.session.dispatch(Command::SentinelVisible);
            if effects.is_empty() {
                break;
            }
            self.run(effects).await?;
            fetched += 1;
        }
        Ok(())
    }

    async fn run(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            for command in self.perform(effect).await? {
                queue.extend(self.session.dispatch(command));
            }
        }
        Ok(())
    }

    async fn perform(&mut self, effect: Effect) -> anyhow::Result<Vec<Command>> {
        let commands = match effect {
            Effect::Login { username, password } => vec![match self.api.client_login(&username, &password).await {
                Ok(session) => Command::LoginSucceeded(session),
                Err(e) => failed(Request::Login, e),
            }],
            Effect::LoginError { message } => anyhow::bail!(message),
            Effect::StoreSession { token, client_name } => {
                self.api.set_token(Some(token.clone()));
                self.config.client = Some(StoredToken::new(token, client_name));
                save_session_config(&self.config)?;
                vec![]
            }
            Effect::Navigate { destination } => {
                output_success(
                    self.output,
                    &format!("Your gallery: {}", destination),
                    Some(json!({ "action": "redirect", "destination": destination })),
                )?;
                vec![]
            }
            Effect::ShowGalleryChoices { galleries } => {
                let rows = galleries.iter().map(|g| format!("{}  /gallery/{}", g.name, g.slug)).collect();
                output_rows(self.output, &json!({ "action": "select", "galleries": galleries }), rows)?;
                vec![]
            }
            Effect::FetchPage { slug, page, limit } => vec![match self.api.my_gallery(&slug, page, limit).await {
                Ok(result) => Command::PageLoaded { page, result },
                Err(e) => failed(Request::Page, e),
            }],
            // A terminal has no viewport; every appended photo counts as seen
            Effect::AppendPhotos { photos } => photos
                .into_iter()
                .map(|photo| Command::PhotoVisible { id: photo.id })
                .collect(),
            Effect::LoadImage { id, url } => {
                self.loaded.push((id, url));
                vec![]
            }
            Effect::PagingComplete => {
                self.complete = true;
                vec![]
            }
            Effect::FieldErrors(fields) => {
                let mut messages: Vec<_> = fields.into_iter().map(|(field, message)| format!("{}: {}", field, message)).collect();
                messages.sort();
                anyhow::bail!(messages.join("; "))
            }
            Effect::Submit(request) => vec![match self.api.submit(&request).await {
                Ok(body) => Command::SubmitSucceeded { message: body.message },
                Err(e) => failed(Request::Submit, e),
            }],
            Effect::Toast { kind, message } => {
                if kind == ToastKind::Error {
                    anyhow::bail!(message);
                }
                output_toast(self.output, kind, &message)?;
                vec![]
            }
            Effect::ClearSession => {
                self.config.client = None;
                save_session_config(&self.config)?;
                anyhow::bail!("Session expired or invalid. Please log in again.")
            }
            Effect::RenderSelection { .. }
            | Effect::ShowLightbox { .. }
            | Effect::HideLightbox
            | Effect::ShowSubmissionForm { .. }
            | Effect::HideSubmissionForm => vec![],
        };
        Ok(commands)
    }
}

fn failed(request: Request, error: ClientError) -> Command {
    Command::RequestFailed {
        request,
        status: error.status(),
        message: error.message(),
    }
}
