//! Message dispatcher - Routes a message to a command or to the conversation service

use std::sync::Arc;

use super::parser::{Content, MessageParser};
use crate::application::services::ConversationService;
use crate::domain::entities::{Command, CommandRegistry, ConversationRecord, InboundMessage, Message};
use crate::domain::traits::Store;

pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again later.";

/// Decides between command execution and conversation for each message.
/// Failures never escape: they are logged and answered with the fallback reply.
pub struct MessageDispatcher {
    parser: MessageParser,
    registry: Arc<CommandRegistry>,
    conversation: Arc<ConversationService>,
    store: Arc<dyn Store>,
    fallback_reply: String,
}

impl MessageDispatcher {
    pub fn new(
        prefix: impl Into<String>,
        registry: Arc<CommandRegistry>,
        conversation: Arc<ConversationService>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            registry,
            conversation,
            store,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    /// Handle one message. `None` means stay silent.
    pub async fn dispatch(&self, message: &InboundMessage) -> Option<String> {
        if !message.addresses_bot() {
            tracing::debug!("[{}] group message without mention, ignored", message.conversation_id);
            return None;
        }

        let handled = match self.parser.parse(&message.text) {
            Content::Command { name, params } => match self.registry.lookup(&name) {
                Ok(command) => Some(self.run_command(command, message, &params).await),
                Err(e) => {
                    tracing::debug!("{}, falling back to conversation", e);
                    None
                }
            },
            Content::Text => None,
        };

        let (reply, messages) = match handled {
            Some(done) => done,
            None => self.converse(message).await,
        };

        self.persist(message, messages).await;
        Some(reply)
    }

    async fn run_command(
        &self,
        command: Arc<dyn Command>,
        message: &InboundMessage,
        params: &[String],
    ) -> (String, Vec<Message>) {
        tracing::info!("[{}] {} runs {}", message.conversation_id, message.sender, command.name());

        let reply = match command.execute(&message.sender, params).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("[{}] {} failed: {}", message.conversation_id, command.name(), e);
                self.fallback_reply.clone()
            }
        };
        let messages = vec![Message::user(&message.text), Message::assistant(&reply)];
        (reply, messages)
    }

    async fn converse(&self, message: &InboundMessage) -> (String, Vec<Message>) {
        match self.conversation.respond(&message.text).await {
            Ok(exchange) => {
                if let Some(function) = &exchange.function {
                    tracing::info!("[{}] answered via {}", message.conversation_id, function);
                }
                (exchange.reply, exchange.messages)
            }
            Err(e) => {
                tracing::error!("[{}] conversation failed: {}", message.conversation_id, e);
                let reply = self.fallback_reply.clone();
                let messages = vec![Message::user(&message.text), Message::assistant(&reply)];
                (reply, messages)
            }
        }
    }

    async fn persist(&self, message: &InboundMessage, messages: Vec<Message>) {
        if let Err(e) = self.store.save_user(&message.sender).await {
            tracing::warn!("Failed to save user {}: {}", message.sender.id, e);
        }

        let record = ConversationRecord::new(&message.sender.id, messages);
        if let Err(e) = self.store.save_exchange(&record).await {
            tracing::warn!("Failed to save exchange {}: {}", record.id, e);
        }
    }
}
