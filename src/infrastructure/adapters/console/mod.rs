//! Console adapter for development/testing

use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{FriendRequest, InboundEvent, InboundMessage, User};
use crate::domain::traits::{ChatGateway, Contact, GatewayInfo};

const ROOM_ID: &str = "console@chatroom";

/// Console gateway for local development.
///
/// Plain lines are direct messages from the console user. Two prefixes
/// simulate other platform events:
/// - `group: <text>` posts into a group chat; `@<bot name>` anywhere in it is a mention
/// - `friend: <nickname> <greeting>` is an incoming friend request
pub struct ConsoleAdapter {
    info: GatewayInfo,
    user: User,
}

impl ConsoleAdapter {
    pub fn new(bot_name: impl Into<String>, user: User) -> Self {
        let name = bot_name.into();
        Self {
            info: GatewayInfo {
                id: "console".to_string(),
                name,
                platform: "console".to_string(),
            },
            user,
        }
    }

    /// Turn one input line into an event. Blank lines yield nothing.
    pub fn parse_line(&self, line: &str) -> Option<InboundEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(text) = line.strip_prefix("group:") {
            let mention = format!("@{}", self.info.name);
            let mentioned = text.contains(&mention);
            let text = text.replace(&mention, "");
            return Some(InboundEvent::Text(InboundMessage::group(
                ROOM_ID,
                self.user.clone(),
                text.trim(),
                mentioned,
            )));
        }

        if let Some(rest) = line.strip_prefix("friend:") {
            let rest = rest.trim();
            let (nickname, greeting) = rest.split_once(' ').unwrap_or((rest, ""));
            return Some(InboundEvent::FriendRequest(FriendRequest {
                alias: nickname.to_lowercase(),
                nickname: nickname.to_string(),
                greeting: greeting.trim().to_string(),
            }));
        }

        Some(InboundEvent::Text(InboundMessage::direct(self.user.clone(), line)))
    }

    /// Read stdin until EOF or until the receiver goes away
    pub async fn listen(&self, events: mpsc::Sender<InboundEvent>) -> Result<(), BotError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Gateway(format!("stdin: {}", e)))?
        {
            let Some(event) = self.parse_line(&line) else {
                continue;
            };
            if events.send(event).await.is_err() {
                break;
            }
        }

        tracing::info!("Console input closed");
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console gateway (dev mode) as {}", self.user.display_name());
        Ok(())
    }

    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT -> {}] {}", conversation_id, text);
        Ok(())
    }

    async fn send_image(&self, conversation_id: &str, path: &Path) -> Result<(), BotError> {
        println!("[BOT -> {}] <image {}>", conversation_id, path.display());
        Ok(())
    }

    async fn friends(&self) -> Result<Vec<Contact>, BotError> {
        Ok(vec![Contact::new(&self.user.id, self.user.display_name())])
    }

    async fn chatrooms(&self) -> Result<Vec<Contact>, BotError> {
        Ok(vec![Contact::new(ROOM_ID, "Console Room")])
    }

    fn info(&self) -> GatewayInfo {
        self.info.clone()
    }
}
