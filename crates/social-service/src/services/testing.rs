//! Shared fixtures for the service tests

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{FutureExt, StreamExt};

use social_common::JwtAuthorizer;
use social_core::forms::UserRegistration;
use social_core::{Event, EventBus, Subscription};
use social_db::MemoryRepository;
use social_events::LocalEventBus;

use super::app::App;
use super::context::Context;

/// Events published since the last drain
pub(crate) struct EventLog {
    stream: BoxStream<'static, Event>,
    _subscription: Box<dyn Subscription>,
}

impl EventLog {
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(Some(event)) = self.stream.next().now_or_never() {
            events.push(event);
        }
        events
    }

    pub fn names(&mut self) -> Vec<&'static str> {
        self.drain().iter().map(Event::name).collect()
    }
}

pub(crate) fn app() -> (App, EventLog) {
    let bus = Arc::new(LocalEventBus::new(64));
    let mut subscription = bus.channel().unwrap();
    let stream = subscription.stream().unwrap();

    let app = App::builder()
        .repo(Arc::new(MemoryRepository::new()))
        .authorizer(Arc::new(JwtAuthorizer::new("test-secret", 3600)))
        .events(bus)
        .build()
        .unwrap();

    (
        app,
        EventLog {
            stream,
            _subscription: subscription,
        },
    )
}

/// Register `username` and return a context authenticated as them
pub(crate) async fn login<'a>(app: &'a App, username: &str) -> Context<'a> {
    let user = app
        .users()
        .register(&Context::anonymous(), UserRegistration::new(username, "secret1"))
        .await
        .unwrap();
    Context::with_caller(user)
}
