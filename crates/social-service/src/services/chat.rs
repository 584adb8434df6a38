//! Chat facade
//!
//! Everything except `member` requires the caller to be a member of the chat.

use std::fmt;

use tracing::{info, instrument};
use uuid::Uuid;

use social_core::entities::{self, MemberStatus};
use social_core::events::{ChatDeletedEvent, ChatMemberEvent};
use social_core::{DomainError, DomainEvent, Page};

use super::app::App;
use super::context::Context;
use super::error::ServiceResult;
use super::member::ChatMember;
use super::message::Message;
use super::user::User;

#[derive(Clone, Copy)]
pub struct Chat<'a> {
    app: &'a App,
    id: Uuid,
}

impl<'a> Chat<'a> {
    pub async fn load(ctx: &Context<'_>, app: &'a App, id: Uuid) -> ServiceResult<Self> {
        ctx.run(app.repo().get_chat(id))
            .await?
            .ok_or(DomainError::DoesNotExist("chat"))?;
        Ok(Self { app, id })
    }

    /// Wrap a row fetched by a trusted caller without re-checking existence
    pub fn from_model_unchecked(app: &'a App, model: &entities::Chat) -> Self {
        Self { app, id: model.id }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Fails with `ResourceInaccessible` unless the caller is a member
    async fn require_member(&self, ctx: &Context<'_>) -> ServiceResult<Uuid> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        let member = ctx
            .run(self.app.repo().get_chat_member(caller, self.id))
            .await?;
        match member {
            Some(_) => Ok(caller),
            None => Err(DomainError::ResourceInaccessible.into()),
        }
    }

    pub async fn model(&self, ctx: &Context<'_>) -> ServiceResult<entities::Chat> {
        self.require_member(ctx).await?;
        ctx.run(self.app.repo().get_chat(self.id))
            .await?
            .ok_or_else(|| DomainError::DoesNotExist("chat").into())
    }

    pub async fn name(&self, ctx: &Context<'_>) -> ServiceResult<String> {
        Ok(self.model(ctx).await?.name)
    }

    pub async fn description(&self, ctx: &Context<'_>) -> ServiceResult<String> {
        Ok(self.model(ctx).await?.description)
    }

    pub async fn owner(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        let model = self.model(ctx).await?;
        User::load(ctx, self.app, model.owner_id).await
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub async fn members(&self, ctx: &Context<'_>, page: Page) -> ServiceResult<Vec<ChatMember<'a>>> {
        self.require_member(ctx).await?;
        let members = ctx.run(self.app.repo().get_chat_members(self.id, page)).await?;
        Ok(members
            .iter()
            .map(|m| ChatMember::from_model_unchecked(self.app, m))
            .collect())
    }

    pub async fn count_members(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.require_member(ctx).await?;
        ctx.run(self.app.repo().count_chat_members(self.id)).await
    }

    /// Existence-only lookup of one membership
    pub async fn member(&self, ctx: &Context<'_>, user_id: Uuid) -> ServiceResult<ChatMember<'a>> {
        ChatMember::load(ctx, self.app, user_id, self.id).await
    }

    /// Add `user_id` to the chat; any member may do this
    #[instrument(skip(self, ctx), fields(chat_id = %self.id))]
    pub async fn add(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        status: MemberStatus,
    ) -> ServiceResult<ChatMember<'a>> {
        self.require_member(ctx).await?;

        let member = entities::ChatMember::new(user_id, self.id, status);
        ctx.run(self.app.repo().create_chat_member(&member)).await?;

        info!(member_id = %user_id, "Chat member added");
        self.app
            .emit(DomainEvent::ChatMemberCreated(ChatMemberEvent {
                chat_id: self.id,
                user_id,
            }));

        ChatMember::load(ctx, self.app, user_id, self.id).await
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Messages of the chat, newest first
    pub async fn messages(&self, ctx: &Context<'_>, page: Page) -> ServiceResult<Vec<Message<'a>>> {
        self.require_member(ctx).await?;
        let messages = ctx.run(self.app.repo().get_chat_messages(self.id, page)).await?;
        Ok(messages
            .iter()
            .map(|m| Message::from_model_unchecked(self.app, m))
            .collect())
    }

    pub async fn count_messages(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.require_member(ctx).await?;
        ctx.run(self.app.repo().count_chat_messages(self.id)).await
    }

    /// Delete the chat with its memberships and messages; owner only
    #[instrument(skip(self, ctx), fields(chat_id = %self.id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let caller = self.require_member(ctx).await?;

        // Membership is not enough; re-read the owner from the current row.
        let model = self.model(ctx).await?;
        if !model.is_owner(caller) {
            return Err(DomainError::RightsViolation.into());
        }

        ctx.run(self.app.repo().delete_chat(self.id)).await?;

        info!("Chat deleted");
        self.app
            .emit(DomainEvent::ChatDeleted(ChatDeletedEvent { chat_id: self.id }));
        Ok(())
    }
}

impl PartialEq for Chat<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Chat<'_> {}

impl fmt::Debug for Chat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chat").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use social_core::forms::{ChatCreation, SendMessage};
    use std::time::Duration;

    async fn chat_with_member<'a>(app: &'a App) -> (Context<'a>, Context<'a>, Chat<'a>) {
        let owner = testing::login(app, "alice").await;
        let member = testing::login(app, "bobby").await;
        let chat = app
            .chats()
            .create(&owner, ChatCreation::new("general", "all the things"))
            .await
            .unwrap();
        chat.add(&owner, member.caller_id().unwrap(), MemberStatus::Active)
            .await
            .unwrap();
        (owner, member, chat)
    }

    #[tokio::test]
    async fn test_creator_is_owner() {
        let (app, _events) = testing::app();
        let owner = testing::login(&app, "alice").await;

        let chat = app
            .chats()
            .create(&owner, ChatCreation::new("general", ""))
            .await
            .unwrap();

        assert_eq!(chat.count_members(&owner).await.unwrap(), 1);
        assert_eq!(chat.name(&owner).await.unwrap(), "general");
        assert_eq!(chat.owner(&owner).await.unwrap(), *owner.caller().unwrap());

        let membership = chat.member(&owner, owner.caller_id().unwrap()).await.unwrap();
        assert_eq!(membership.status(&owner).await.unwrap(), MemberStatus::Owner);
    }

    #[tokio::test]
    async fn test_add_member() {
        let (app, mut events) = testing::app();
        let (owner, member, chat) = chat_with_member(&app).await;

        assert_eq!(events.names(), ["chat_member_created"]);
        assert_eq!(chat.count_members(&member).await.unwrap(), 2);
        assert_eq!(chat.description(&member).await.unwrap(), "all the things");

        let err = chat
            .add(&owner, member.caller_id().unwrap(), MemberStatus::Active)
            .await
            .unwrap_err();
        assert!(err.as_domain().unwrap().is_conflict());
    }

    #[tokio::test]
    async fn test_non_member_is_locked_out() {
        let (app, _events) = testing::app();
        let (_owner, _member, chat) = chat_with_member(&app).await;
        let outsider = testing::login(&app, "carol").await;

        let err = chat.members(&outsider, Page::default()).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        let err = chat.name(&Context::anonymous()).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        let err = chat
            .add(&outsider, outsider.caller_id().unwrap(), MemberStatus::Active)
            .await
            .unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
        let err = chat.delete(&outsider).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::ResourceInaccessible));
    }

    #[tokio::test]
    async fn test_only_owner_deletes() {
        let (app, mut events) = testing::app();
        let (owner, member, chat) = chat_with_member(&app).await;
        events.drain();

        let err = chat.delete(&member).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::RightsViolation));
        assert_eq!(chat.count_members(&owner).await.unwrap(), 2);

        chat.delete(&owner).await.unwrap();
        assert_eq!(events.names(), ["chat_deleted"]);

        let err = Chat::load(&owner, &app, chat.id()).await.unwrap_err();
        assert_eq!(err.as_domain(), Some(&DomainError::DoesNotExist("chat")));
        assert_eq!(member.caller().unwrap().count_chats(&member).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_messages_newest_first() {
        let (app, _events) = testing::app();
        let (owner, member, chat) = chat_with_member(&app).await;
        let sender = chat.member(&member, member.caller_id().unwrap()).await.unwrap();

        let mut sent = Vec::new();
        for n in 0..3 {
            let message = sender
                .send_message(&member, SendMessage { payload: format!("message {n}") })
                .await
                .unwrap();
            sent.push(message);
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        assert_eq!(chat.count_messages(&owner).await.unwrap(), 3);

        let newest = chat.messages(&owner, Page::new(0, 2)).await.unwrap();
        assert_eq!(newest, vec![sent[2], sent[1]]);
        let oldest = chat.messages(&owner, Page::new(2, 2)).await.unwrap();
        assert_eq!(oldest, vec![sent[0]]);
    }
}
