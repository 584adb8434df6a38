//! Chat manager - chat creation and top-level lookups

use futures::FutureExt;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use social_core::entities::{self, MemberStatus};
use social_core::forms::ChatCreation;
use social_core::DomainError;

use super::app::App;
use super::chat::Chat;
use super::context::Context;
use super::error::{ServiceError, ServiceResult};
use super::message::Message;

pub struct ChatManager<'a> {
    app: &'a App,
}

impl<'a> ChatManager<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    pub async fn get(&self, ctx: &Context<'_>, id: Uuid) -> ServiceResult<Chat<'a>> {
        Chat::load(ctx, self.app, id).await
    }

    /// Create a chat owned by the caller, together with the owner's
    /// membership, in one transaction
    #[instrument(skip(self, ctx, form))]
    pub async fn create(&self, ctx: &Context<'_>, form: ChatCreation) -> ServiceResult<Chat<'a>> {
        let owner_id = ctx.require_caller()?;
        form.validate()?;

        let chat = entities::Chat::new(form.name, form.description, owner_id);
        let member = entities::ChatMember::new(owner_id, chat.id, MemberStatus::Owner);
        let row = chat.clone();
        self.app
            .transaction(ctx, move |tx| {
                async move {
                    tx.create_chat(&row).await?;
                    tx.create_chat_member(&member).await?;
                    Ok::<(), ServiceError>(())
                }
                .boxed()
            })
            .await?;

        info!(chat_id = %chat.id, owner_id = %owner_id, "Chat created");
        Ok(Chat::from_model_unchecked(self.app, &chat))
    }

    /// A message by id; only its author may look it up here
    pub async fn get_message(&self, ctx: &Context<'_>, id: Uuid) -> ServiceResult<Message<'a>> {
        let caller = ctx.require_caller()?;
        let message = ctx
            .run(self.app.repo().get_message(id))
            .await?
            .ok_or(DomainError::DoesNotExist("message"))?;
        if message.user_id != caller {
            return Err(DomainError::ResourceInaccessible.into());
        }
        Ok(Message::from_model_unchecked(self.app, &message))
    }
}
