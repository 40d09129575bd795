//! Event router - explicit (kind, predicate, handler) table built at startup

use async_trait::async_trait;
use std::sync::Arc;

use super::dispatcher::MessageDispatcher;
use crate::domain::entities::{ChatKind, InboundEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    FriendRequest,
    DirectText,
    GroupText,
}

impl EventKind {
    pub fn of(event: &InboundEvent) -> Self {
        match event {
            InboundEvent::FriendRequest(_) => EventKind::FriendRequest,
            InboundEvent::Text(msg) => match msg.chat {
                ChatKind::Direct => EventKind::DirectText,
                ChatKind::Group { .. } => EventKind::GroupText,
            },
        }
    }
}

/// Handles an event, returning the text to send back (if any)
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &InboundEvent) -> Option<String>;
}

type Predicate = Box<dyn Fn(&InboundEvent) -> bool + Send + Sync>;

struct Route {
    kind: EventKind,
    predicate: Predicate,
    handler: Arc<dyn EventHandler>,
}

/// Ordered routing table; the first matching route handles the event
#[derive(Default)]
pub struct EventRouter {
    routes: Vec<Route>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<P>(mut self, kind: EventKind, predicate: P, handler: Arc<dyn EventHandler>) -> Self
    where
        P: Fn(&InboundEvent) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            kind,
            predicate: Box::new(predicate),
            handler,
        });
        self
    }

    /// Friend requests are logged, direct texts dispatched, group texts only when mentioned
    pub fn standard(dispatcher: Arc<MessageDispatcher>) -> Self {
        Self::new()
            .on(EventKind::FriendRequest, |_| true, Arc::new(FriendRequestLogger))
            .on(EventKind::DirectText, |_| true, dispatcher.clone())
            .on(EventKind::GroupText, is_mentioned, dispatcher)
    }

    pub async fn route(&self, event: &InboundEvent) -> Option<String> {
        let kind = EventKind::of(event);
        let route = self
            .routes
            .iter()
            .find(|route| route.kind == kind && (route.predicate)(event))?;
        route.handler.handle(event).await
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

fn is_mentioned(event: &InboundEvent) -> bool {
    matches!(event, InboundEvent::Text(msg) if msg.chat == ChatKind::Group { mentioned: true })
}

/// Logs connection requests; never replies
pub struct FriendRequestLogger;

#[async_trait]
impl EventHandler for FriendRequestLogger {
    async fn handle(&self, event: &InboundEvent) -> Option<String> {
        if let InboundEvent::FriendRequest(req) = event {
            tracing::info!("{}({}) requested to connect: {}", req.nickname, req.alias, req.greeting);
        }
        None
    }
}

#[async_trait]
impl EventHandler for MessageDispatcher {
    async fn handle(&self, event: &InboundEvent) -> Option<String> {
        match event {
            InboundEvent::Text(message) => self.dispatch(message).await,
            InboundEvent::FriendRequest(_) => None,
        }
    }
}
