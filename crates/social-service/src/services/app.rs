//! Application root - the repository, authorizer and event bus every facade
//! borrows

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::time::timeout_at;
use tracing::{debug, instrument, warn};

use social_common::{AppError, Authorizer};
use social_core::{DomainError, DomainEvent, Event, EventBus, Repository, Transaction};

use super::chat_manager::ChatManager;
use super::context::Context;
use super::error::{ServiceError, ServiceResult};
use super::user::User;
use super::user_manager::UserManager;

/// Aggregate root shared by all facades
///
/// Facades hold a plain `&App`; they never own it.
pub struct App {
    repo: Arc<dyn Repository>,
    authorizer: Arc<dyn Authorizer>,
    bus: Arc<dyn EventBus>,
}

impl App {
    pub fn new(
        repo: Arc<dyn Repository>,
        authorizer: Arc<dyn Authorizer>,
        bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            repo,
            authorizer,
            bus,
        }
    }

    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    // === Collaborators ===

    pub fn repo(&self) -> &dyn Repository {
        self.repo.as_ref()
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    pub fn events(&self) -> &dyn EventBus {
        self.bus.as_ref()
    }

    // === Managers ===

    pub fn users(&self) -> UserManager<'_> {
        UserManager::new(self)
    }

    pub fn chats(&self) -> ChatManager<'_> {
        ChatManager::new(self)
    }

    /// Resolve a bearer token into a request context
    ///
    /// An invalid or expired token, or a token naming a deleted user, yields
    /// an anonymous context rather than an error.
    #[instrument(skip_all)]
    pub async fn context_for_token(&self, token: &str) -> ServiceResult<Context<'_>> {
        let user_id = match self.authorizer.verify(token) {
            Ok(id) => id,
            Err(e) => {
                debug!(error = %e, "Rejected token");
                return Ok(Context::anonymous());
            }
        };

        match self.repo.get_user(user_id).await? {
            Some(user) => Ok(Context::with_caller(User::from_model_unchecked(self, &user))),
            None => {
                debug!(user_id = %user_id, "Token names a deleted user");
                Ok(Context::anonymous())
            }
        }
    }

    /// Run `f` inside one repository transaction
    ///
    /// Commits when `f` succeeds and rolls back when it fails. If the context
    /// deadline passes first, the transaction is dropped (and so rolled back)
    /// and `DeadlineExceeded` is returned.
    pub async fn transaction<T, F>(&self, ctx: &Context<'_>, f: F) -> ServiceResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t dyn Transaction) -> BoxFuture<'t, ServiceResult<T>> + Send,
    {
        let run = async {
            let tx = self.repo.begin().await?;
            match f(tx.as_ref()).await {
                Ok(value) => {
                    tx.commit().await?;
                    Ok::<T, ServiceError>(value)
                }
                Err(e) => {
                    if let Err(rollback) = tx.rollback().await {
                        warn!(error = %rollback, "Rollback failed");
                    }
                    Err(e)
                }
            }
        };

        match ctx.deadline() {
            Some(deadline) => timeout_at(deadline, run)
                .await
                .map_err(|_| DomainError::DeadlineExceeded)?,
            None => run.await,
        }
    }

    /// Publish an event; failures are logged and never reach the caller
    pub(crate) fn emit(&self, event: DomainEvent) {
        let name = event.name();
        if let Err(e) = self.bus.send(Event::now(event)) {
            warn!(event = name, error = %e, "Failed to publish event");
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("repo", &"dyn Repository")
            .field("authorizer", &"dyn Authorizer")
            .field("bus", &"dyn EventBus")
            .finish()
    }
}

/// Builder for [`App`]
#[derive(Default)]
pub struct AppBuilder {
    repo: Option<Arc<dyn Repository>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    bus: Option<Arc<dyn EventBus>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn repo(mut self, repo: Arc<dyn Repository>) -> Self {
        self.repo = Some(repo);
        self
    }

    #[must_use]
    pub fn authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    #[must_use]
    pub fn events(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the App
    ///
    /// # Errors
    /// Returns a configuration error if any collaborator is missing
    pub fn build(self) -> ServiceResult<App> {
        let missing = |what: &str| ServiceError::App(AppError::Config(format!("{what} is required")));
        Ok(App::new(
            self.repo.ok_or_else(|| missing("repository"))?,
            self.authorizer.ok_or_else(|| missing("authorizer"))?,
            self.bus.ok_or_else(|| missing("event bus"))?,
        ))
    }
}
