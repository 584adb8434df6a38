//! Chat member facade

use std::fmt;

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use social_core::entities::{self, MemberStatus};
use social_core::events::{ChatMemberEvent, MessageEvent};
use social_core::forms::SendMessage;
use social_core::{DomainError, DomainEvent};

use super::app::App;
use super::chat::Chat;
use super::context::Context;
use super::error::ServiceResult;
use super::message::Message;
use super::user::User;

/// One user's membership in one chat
#[derive(Clone, Copy)]
pub struct ChatMember<'a> {
    app: &'a App,
    user_id: Uuid,
    chat_id: Uuid,
}

impl<'a> ChatMember<'a> {
    pub async fn load(
        ctx: &Context<'_>,
        app: &'a App,
        user_id: Uuid,
        chat_id: Uuid,
    ) -> ServiceResult<Self> {
        ctx.run(app.repo().get_chat_member(user_id, chat_id))
            .await?
            .ok_or(DomainError::DoesNotExist("chat member"))?;
        Ok(Self {
            app,
            user_id,
            chat_id,
        })
    }

    /// Wrap a row fetched by a trusted caller without re-checking existence
    pub fn from_model_unchecked(app: &'a App, model: &entities::ChatMember) -> Self {
        Self {
            app,
            user_id: model.user_id,
            chat_id: model.chat_id,
        }
    }

    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    #[inline]
    pub fn chat_id(&self) -> Uuid {
        self.chat_id
    }

    pub async fn chat(&self, ctx: &Context<'_>) -> ServiceResult<Chat<'a>> {
        Chat::load(ctx, self.app, self.chat_id).await
    }

    pub async fn user(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        User::load(ctx, self.app, self.user_id).await
    }

    /// The caller must be a member of the same chat, not necessarily this one
    async fn require_writable(&self, ctx: &Context<'_>) -> ServiceResult<Uuid> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        let membership = ctx
            .run(self.app.repo().get_chat_member(caller, self.chat_id))
            .await?;
        match membership {
            Some(_) => Ok(caller),
            None => Err(DomainError::ResourceInaccessible.into()),
        }
    }

    pub async fn status(&self, ctx: &Context<'_>) -> ServiceResult<MemberStatus> {
        self.require_writable(ctx).await?;
        let model = ctx
            .run(self.app.repo().get_chat_member(self.user_id, self.chat_id))
            .await?
            .ok_or(DomainError::DoesNotExist("chat member"))?;
        Ok(model.status)
    }

    /// Post a message as this member; the caller must be this member
    #[instrument(skip(self, ctx, form), fields(chat_id = %self.chat_id, user_id = %self.user_id))]
    pub async fn send_message(&self, ctx: &Context<'_>, form: SendMessage) -> ServiceResult<Message<'a>> {
        let caller = self.require_writable(ctx).await?;
        if caller != self.user_id {
            return Err(DomainError::RightsViolation.into());
        }
        form.validate()?;

        let message = entities::Message::new(self.chat_id, self.user_id, form.payload);
        ctx.run(self.app.repo().create_message(&message)).await?;

        info!(message_id = %message.id, "Message sent");
        self.app.emit(DomainEvent::NewMessage(MessageEvent {
            message_id: message.id,
            chat_id: message.chat_id,
        }));

        Ok(Message::from_model_unchecked(self.app, &message))
    }

    /// Remove the membership along with the member's messages in the chat
    ///
    /// Allowed for the member themselves and for the chat owner.
    #[instrument(skip(self, ctx), fields(chat_id = %self.chat_id, user_id = %self.user_id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let caller = self.require_writable(ctx).await?;
        if caller != self.user_id {
            let chat = ctx
                .run(self.app.repo().get_chat(self.chat_id))
                .await?
                .ok_or(DomainError::DoesNotExist("chat"))?;
            if !chat.is_owner(caller) {
                return Err(DomainError::RightsViolation.into());
            }
        }

        ctx.run(
            self.app
                .repo()
                .delete_chat_member(self.user_id, self.chat_id),
        )
        .await?;

        info!("Chat member removed");
        self.app
            .emit(DomainEvent::ChatMemberDeleted(ChatMemberEvent {
                chat_id: self.chat_id,
                user_id: self.user_id,
            }));
        Ok(())
    }
}

impl PartialEq for ChatMember<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.chat_id == other.chat_id
    }
}

impl Eq for ChatMember<'_> {}

impl fmt::Debug for ChatMember<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatMember")
            .field("user_id", &self.user_id)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
