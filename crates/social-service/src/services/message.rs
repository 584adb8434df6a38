//! Message facade
//!
//! The accessors and mutations are author-only. `view` is the member-level
//! read used when listing a chat.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use social_core::entities;
use social_core::events::MessageEvent;
use social_core::forms::MessageUpdate;
use social_core::{DomainError, DomainEvent};

use super::app::App;
use super::chat::Chat;
use super::context::Context;
use super::error::ServiceResult;
use super::user::User;

#[derive(Clone, Copy)]
pub struct Message<'a> {
    app: &'a App,
    id: Uuid,
}

impl<'a> Message<'a> {
    pub async fn load(ctx: &Context<'_>, app: &'a App, id: Uuid) -> ServiceResult<Self> {
        let message = Self { app, id };
        message.fetch(ctx).await?;
        Ok(message)
    }

    /// Wrap a row fetched by a trusted caller without re-checking existence
    pub fn from_model_unchecked(app: &'a App, model: &entities::Message) -> Self {
        Self { app, id: model.id }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn fetch(&self, ctx: &Context<'_>) -> ServiceResult<entities::Message> {
        ctx.run(self.app.repo().get_message(self.id))
            .await?
            .ok_or_else(|| DomainError::DoesNotExist("message").into())
    }

    /// The row, if the caller wrote it
    pub async fn model(&self, ctx: &Context<'_>) -> ServiceResult<entities::Message> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        let model = self.fetch(ctx).await?;
        if model.user_id == caller {
            Ok(model)
        } else {
            Err(DomainError::ResourceInaccessible.into())
        }
    }

    /// The row, if the caller is a member of the message's chat
    pub async fn view(&self, ctx: &Context<'_>) -> ServiceResult<entities::Message> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        let model = self.fetch(ctx).await?;
        let membership = ctx
            .run(self.app.repo().get_chat_member(caller, model.chat_id))
            .await?;
        match membership {
            Some(_) => Ok(model),
            None => Err(DomainError::ResourceInaccessible.into()),
        }
    }

    pub async fn sender(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        let model = self.model(ctx).await?;
        User::load(ctx, self.app, model.user_id).await
    }

    pub async fn chat(&self, ctx: &Context<'_>) -> ServiceResult<Chat<'a>> {
        let model = self.model(ctx).await?;
        Chat::load(ctx, self.app, model.chat_id).await
    }

    pub async fn payload(&self, ctx: &Context<'_>) -> ServiceResult<String> {
        Ok(self.model(ctx).await?.payload)
    }

    pub async fn timestamp(&self, ctx: &Context<'_>) -> ServiceResult<DateTime<Utc>> {
        Ok(self.model(ctx).await?.created_at)
    }

    pub async fn last_update(&self, ctx: &Context<'_>) -> ServiceResult<DateTime<Utc>> {
        Ok(self.model(ctx).await?.last_update)
    }

    #[instrument(skip(self, ctx, form), fields(message_id = %self.id))]
    pub async fn update(&self, ctx: &Context<'_>, form: MessageUpdate) -> ServiceResult<()> {
        let mut model = self.model(ctx).await?;
        form.validate()?;

        model.edit(form.payload);
        ctx.run(self.app.repo().update_message(&model)).await?;

        info!("Message updated");
        self.app.emit(DomainEvent::MessageUpdated(MessageEvent {
            message_id: model.id,
            chat_id: model.chat_id,
        }));
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(message_id = %self.id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        // Resolve the chat before the row is gone; the event needs it.
        let model = self.model(ctx).await?;
        ctx.run(self.app.repo().delete_message(self.id)).await?;

        info!("Message deleted");
        self.app.emit(DomainEvent::MessageDeleted(MessageEvent {
            message_id: self.id,
            chat_id: model.chat_id,
        }));
        Ok(())
    }
}

impl PartialEq for Message<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message<'_> {}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use social_core::forms::{ChatCreation, SendMessage};
    use social_core::MemberStatus;

    async fn posted<'a>(app: &'a App) -> (Context<'a>, Context<'a>, Message<'a>) {
        let author = testing::login(app, "alice").await;
        let reader = testing::login(app, "bobby").await;
        let chat = app
            .chats()
            .create(&author, ChatCreation::new("general", ""))
            .await
            .unwrap();
        chat.add(&author, reader.caller_id().unwrap(), MemberStatus::Active)
            .await
            .unwrap();
        let message = chat
            .member(&author, author.caller_id().unwrap())
            .await
            .unwrap()
            .send_message(&author, SendMessage { payload: "first".into() })
            .await
            .unwrap();
        (author, reader, message)
    }

    #[tokio::test]
    async fn test_author_accessors() {
        let (app, _events) = testing::app();
        let (author, reader, message) = posted(&app).await;

        assert_eq!(message.payload(&author).await.unwrap(), "first");
        assert_eq!(message.sender(&author).await.unwrap(), *author.caller().unwrap());
        assert_eq!(
            message.timestamp(&author).await.unwrap(),
            message.last_update(&author).await.unwrap()
        );

        let err = message.payload(&reader).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        let err = message.chat(&Context::anonymous()).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
    }

    #[tokio::test]
    async fn test_update_by_author_only() {
        let (app, mut events) = testing::app();
        let (author, reader, message) = posted(&app).await;
        events.drain();

        let err = message
            .update(&reader, MessageUpdate { payload: "edited".into() })
            .await
            .unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        let err = message
            .update(&Context::anonymous(), MessageUpdate { payload: "edited".into() })
            .await
            .unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        assert!(events.drain().is_empty());

        message
            .update(&author, MessageUpdate { payload: "edited".into() })
            .await
            .unwrap();
        assert_eq!(events.names(), ["message_updated"]);

        let row = message.model(&author).await.unwrap();
        assert_eq!(row.payload, "edited");
        assert!(row.last_update >= row.created_at);
    }

    #[tokio::test]
    async fn test_delete_reports_chat() {
        let (app, mut events) = testing::app();
        let (author, reader, message) = posted(&app).await;
        let chat_id = message.view(&reader).await.unwrap().chat_id;
        events.drain();

        let err = message.delete(&reader).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));

        message.delete(&author).await.unwrap();
        let published = events.drain();
        assert_eq!(
            published[0].kind,
            DomainEvent::MessageDeleted(MessageEvent {
                message_id: message.id(),
                chat_id,
            })
        );

        let err = message.payload(&author).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::DoesNotExist("message")));
    }
}
