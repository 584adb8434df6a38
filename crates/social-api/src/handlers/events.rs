//! Server-sent event feed
//!
//! Streams the domain events that concern the caller: events naming them
//! directly (friendship, their own membership changes) and events of chats
//! they belong to.

use std::collections::HashSet;
use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use social_core::{DomainEvent, Event, Page, Subscription};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::current_user;
use crate::extractors::Session;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// One connected client
struct Feed {
    events: BoxStream<'static, Event>,
    // Dropping the subscription unregisters it from the bus
    _subscription: Box<dyn Subscription>,
    state: AppState,
    caller: Uuid,
    chats: HashSet<Uuid>,
}

impl Feed {
    async fn is_relevant(&mut self, event: &DomainEvent) -> bool {
        if event.user_ids().contains(&self.caller) {
            match event {
                DomainEvent::ChatMemberCreated(e) => {
                    self.chats.insert(e.chat_id);
                }
                DomainEvent::ChatMemberDeleted(e) => {
                    self.chats.remove(&e.chat_id);
                }
                _ => {}
            }
            return true;
        }

        let Some(chat_id) = event.chat_id() else {
            return false;
        };

        let member = self.chats.contains(&chat_id)
            || is_member(&self.state, self.caller, chat_id).await;
        if matches!(event, DomainEvent::ChatDeleted(_)) {
            self.chats.remove(&chat_id);
        } else if member {
            self.chats.insert(chat_id);
        }
        member
    }

    async fn next(&mut self) -> Option<Event> {
        while let Some(event) = self.events.next().await {
            if self.is_relevant(&event.kind).await {
                return Some(event);
            }
        }
        None
    }
}

async fn is_member(state: &AppState, user_id: Uuid, chat_id: Uuid) -> bool {
    match state.app().repo().get_chat_member(user_id, chat_id).await {
        Ok(membership) => membership.is_some(),
        Err(e) => {
            warn!(chat_id = %chat_id, error = %e, "Membership lookup failed");
            false
        }
    }
}

fn encode(event: &Event) -> SseEvent {
    SseEvent::default()
        .event(event.name())
        .json_data(event)
        .unwrap_or_else(|e| {
            warn!(event = event.name(), error = %e, "Failed to encode event");
            SseEvent::default().comment("encoding failed")
        })
}

/// Subscribe to the caller's event feed
///
/// GET /events
pub async fn event_feed(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let caller = me.id();

    // Subscribe first so nothing published while the chats load is missed
    let mut subscription = state
        .app()
        .events()
        .channel()
        .map_err(ApiError::internal)?;
    let events = subscription.stream().map_err(ApiError::internal)?;

    let mut chats = HashSet::new();
    let mut offset = 0;
    loop {
        let page = me.chats(&ctx, Page::new(offset, Page::MAX_COUNT)).await?;
        let fetched = page.len() as i64;
        chats.extend(page.iter().map(|membership| membership.chat_id()));
        if fetched < Page::MAX_COUNT {
            break;
        }
        offset += fetched;
    }

    info!(user_id = %caller, chats = chats.len(), "Event feed opened");

    let feed = Feed {
        events,
        _subscription: subscription,
        state: state.clone(),
        caller,
        chats,
    };

    let stream = stream::unfold(feed, |mut feed| async move {
        let event = feed.next().await?;
        debug!(user_id = %feed.caller, event = event.name(), "Delivering event");
        Some((Ok(encode(&event)), feed))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
