//! Request context - the caller identity and deadline of one inbound call

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use uuid::Uuid;

use social_core::{DomainError, RepoResult};

use super::error::ServiceResult;
use super::user::User;

/// Per-request context passed to every facade and manager operation
///
/// The caller is set once by the authentication layer before any facade
/// call runs. `None` means the request is anonymous.
#[derive(Debug, Clone, Default)]
pub struct Context<'a> {
    caller: Option<User<'a>>,
    deadline: Option<Instant>,
}

impl<'a> Context<'a> {
    /// An anonymous context without a deadline
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_caller(caller: User<'a>) -> Self {
        Self {
            caller: Some(caller),
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn caller(&self) -> Option<&User<'a>> {
        self.caller.as_ref()
    }

    pub fn caller_id(&self) -> Option<Uuid> {
        self.caller.as_ref().map(User::id)
    }

    pub fn set_caller(&mut self, caller: Option<User<'a>>) {
        self.caller = caller;
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Id of the caller, or `NotAuthorized` for anonymous requests
    pub fn require_caller(&self) -> Result<Uuid, DomainError> {
        self.caller_id().ok_or(DomainError::NotAuthorized)
    }

    /// Run a repository call under this context's deadline
    pub async fn run<T, F>(&self, fut: F) -> ServiceResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        let result = match self.deadline {
            Some(deadline) => timeout_at(deadline, fut)
                .await
                .map_err(|_| DomainError::DeadlineExceeded)?,
            None => fut.await,
        };
        Ok(result?)
    }
}
