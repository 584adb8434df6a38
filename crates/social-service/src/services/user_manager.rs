//! User manager - registration, login and token issuing

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use social_common::{hash_password, verify_password};
use social_core::entities;
use social_core::forms::{UserLogin, UserRegistration};
use social_core::DomainError;

use super::app::App;
use super::context::Context;
use super::error::ServiceResult;
use super::user::User;

pub struct UserManager<'a> {
    app: &'a App,
}

impl<'a> UserManager<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Create an account. Anonymous callers only.
    #[instrument(skip(self, ctx, form), fields(username = %form.username))]
    pub async fn register(&self, ctx: &Context<'_>, form: UserRegistration) -> ServiceResult<User<'a>> {
        if ctx.is_authenticated() {
            return Err(DomainError::AlreadyAuthorized.into());
        }
        form.validate()?;

        let password_hash = hash_password(&form.password)?;
        let user = entities::User::new(form.username, password_hash);
        ctx.run(self.app.repo().create_user(&user)).await?;

        info!(user_id = %user.id, "User registered");
        Ok(User::from_model_unchecked(self.app, &user))
    }

    /// Check credentials. An unknown username and a wrong password fail the
    /// same way.
    #[instrument(skip(self, ctx, form), fields(username = %form.username))]
    pub async fn login(&self, ctx: &Context<'_>, form: UserLogin) -> ServiceResult<User<'a>> {
        if ctx.is_authenticated() {
            return Err(DomainError::AlreadyAuthorized.into());
        }
        form.validate()?;

        let Some(user) = ctx
            .run(self.app.repo().get_user_by_username(&form.username))
            .await?
        else {
            warn!("Login failed: unknown username");
            return Err(DomainError::InvalidCredentials.into());
        };

        if !verify_password(&form.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(DomainError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        Ok(User::from_model_unchecked(self.app, &user))
    }

    pub async fn get(&self, ctx: &Context<'_>, id: Uuid) -> ServiceResult<User<'a>> {
        User::load(ctx, self.app, id).await
    }

    /// Issue an access token for `user`
    pub fn issue_token(&self, user: &User<'_>) -> ServiceResult<String> {
        Ok(self.app.authorizer().generate_token(user.id())?)
    }
}
