use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};

use super::commands::Command;
use super::render;
use crate::configuration::types::Config;
use crate::error_handling::types::{ControllerError, StorageError};
use crate::feedback::types::NewFeedback;
use crate::gateway::client::HttpGateway;
use crate::gateway::remote_trait::{AuthRemote, FeedbackRemote};
use crate::query::types::FeedbackQuery;
use crate::repository::FeedbackRepository;
use crate::session_management::{CredentialProvider, SessionManager};
use crate::storage::file_storage::FileStore;
use crate::storage::storage_trait::FallbackStore;

/// Owns every component of one run and dispatches commands to them.
pub struct Controller<R, S> {
    config: Config,
    remote: Arc<R>,
    store: Arc<S>,
    sessions: Arc<SessionManager<S>>,
    repository: FeedbackRepository<R, S>,
}

impl Controller<HttpGateway, FileStore> {
    /// Production wiring: file-backed store, restored session, HTTP gateway
    /// reading its bearer token from that session.
    pub fn from_config(config: Config) -> Result<Self, ControllerError> {
        info!("Opening local store at {}", config.storage.path.display());
        let store = Arc::new(FileStore::new(&config.storage.path).map_err(|e| {
            error!("Unable to open the local store: {}", e);
            ControllerError::InitializationFailed(e.to_string())
        })?);
        let sessions = Arc::new(SessionManager::restore(store.clone())?);
        let gateway = HttpGateway::new(&config.api)?.with_credentials(sessions.clone());
        Self::new(config, Arc::new(gateway), store, sessions)
    }
}

impl<R, S> Controller<R, S>
where
    R: FeedbackRemote + AuthRemote,
    S: FallbackStore,
{
    pub fn new(
        config: Config,
        remote: Arc<R>,
        store: Arc<S>,
        sessions: Arc<SessionManager<S>>,
    ) -> Result<Self, ControllerError> {
        let repository = FeedbackRepository::open(remote.clone(), store.clone())?
            .with_sync_page_size(config.api.sync_page_size);
        Ok(Self {
            config,
            remote,
            store,
            sessions,
            repository,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &FeedbackRepository<R, S> {
        &self.repository
    }

    pub fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    /// Runs one command and returns what should be shown to the user.
    pub async fn run(&self, command: Command) -> Result<String, ControllerError> {
        debug!("Running `{}`", command.name());
        if command.requires_login() && !self.sessions.is_authenticated() {
            return Err(ControllerError::LoginRequired(command.name()));
        }

        match command {
            Command::Login { email, password } => {
                let session = self.sessions.login(self.remote.as_ref(), &email, &password).await?;
                Ok(format!("Logged in as {}", render::user(&session.user)))
            }
            Command::Signup {
                name,
                email,
                password,
            } => {
                let session = self
                    .sessions
                    .signup(self.remote.as_ref(), &name, &email, &password)
                    .await?;
                Ok(format!("Welcome, {}", render::user(&session.user)))
            }
            Command::Logout => {
                self.sessions.logout()?;
                Ok("Logged out".to_string())
            }
            Command::Whoami => Ok(match self.sessions.current_user() {
                Some(user) => render::user(&user),
                None => "Not logged in".to_string(),
            }),
            Command::Profile { name, email } => {
                let user = self
                    .sessions
                    .update_profile(name.as_deref(), email.as_deref())?;
                Ok(format!("Profile updated: {}", render::user(&user)))
            }
            Command::List => {
                let listing = self.repository.list().await?;
                Ok(render::listing(&listing.items, listing.source))
            }
            Command::Search {
                query,
                status,
                kind,
                sort,
                page,
                page_size,
            } => {
                let query = FeedbackQuery {
                    text: query,
                    status,
                    kind,
                    sort,
                    page,
                    page_size: page_size.unwrap_or(self.config.query.default_page_size),
                };
                let outcome = self.repository.search(&query).await?;
                Ok(render::page(&outcome.page, outcome.source))
            }
            Command::Submit {
                name,
                email,
                kind,
                priority,
                title,
                description,
                rating,
            } => {
                let user = self.sessions.current_user();
                let author_name = name
                    .or_else(|| user.as_ref().map(|u| u.name.clone()))
                    .unwrap_or_default();
                let author_email = email
                    .or_else(|| user.as_ref().map(|u| u.email.clone()))
                    .unwrap_or_default();
                let draft = NewFeedback {
                    author_name,
                    author_email,
                    kind,
                    priority,
                    title,
                    description,
                    rating,
                };
                let outcome = self.repository.create(draft).await?;
                Ok(render::saved(&outcome))
            }
            Command::Status { id, status } => {
                let change = self.repository.update_status(&id, status).await?;
                Ok(format!(
                    "Feedback {} is now {}{}",
                    change.item.id,
                    change.item.status,
                    render::sync_suffix(change.sync)
                ))
            }
            Command::Delete { id } => {
                let removal = self.repository.remove(&id).await?;
                Ok(format!(
                    "Deleted feedback {}{}",
                    removal.id,
                    render::sync_suffix(removal.sync)
                ))
            }
            Command::Stats => Ok(render::stats(&self.repository.stats(Utc::now()))),
            Command::Theme { value, toggle } => {
                let current = self.store.load_theme()?;
                let next = match (value, toggle) {
                    (Some(theme), _) => theme,
                    (None, true) => current.toggled(),
                    (None, false) => return Ok(format!("Theme: {current}")),
                };
                self.store.save_theme(next).map_err(|e: StorageError| {
                    error!("Unable to save the theme: {}", e);
                    e
                })?;
                Ok(format!("Theme: {next}"))
            }
        }
    }
}
