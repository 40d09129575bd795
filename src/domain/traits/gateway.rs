use async_trait::async_trait;
use std::path::Path;

use crate::application::errors::BotError;

/// ChatGateway - abstraction for chat platform adapters
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Start the gateway (login, session restore)
    async fn start(&self) -> Result<(), BotError>;

    /// Send a text message to a conversation
    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), BotError>;

    /// Send an image file to a conversation
    async fn send_image(&self, conversation_id: &str, path: &Path) -> Result<(), BotError>;

    /// Contacts of the logged-in account
    async fn friends(&self) -> Result<Vec<Contact>, BotError>;

    /// Group chats the account is a member of
    async fn chatrooms(&self) -> Result<Vec<Contact>, BotError>;

    /// Get gateway info
    fn info(&self) -> GatewayInfo;
}

/// A friend or a group as listed by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub nickname: String,
}

impl Contact {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
        }
    }
}

/// Gateway information
#[derive(Debug, Clone)]
pub struct GatewayInfo {
    pub id: String,
    pub name: String,
    pub platform: String,
}
