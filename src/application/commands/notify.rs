//! `/notify [text]` - announce a message to every friend

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, User};
use crate::domain::traits::ChatGateway;

pub struct NotifyCommand {
    gateway: Arc<dyn ChatGateway>,
}

impl NotifyCommand {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Command for NotifyCommand {
    fn name(&self) -> &str {
        "/notify"
    }

    fn description(&self) -> &str {
        "Announce the given text to all friends"
    }

    async fn execute(&self, user: &User, params: &[String]) -> Result<String, CommandError> {
        let friends = self
            .gateway
            .friends()
            .await
            .map_err(|e| CommandError::Gateway(e.to_string()))?;
        tracing::debug!("{} friends: {:?}", friends.len(), friends);

        let announcement = params.get(1..).unwrap_or_default().join(" ");
        if announcement.is_empty() {
            return Ok(format!("/notify command executed. {} friends.", friends.len()));
        }

        tracing::info!("{} announces to {} friends", user, friends.len());
        let mut delivered = 0;
        for friend in &friends {
            match self.gateway.send_text(&friend.id, &announcement).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Announcement to {} failed: {}", friend.nickname, e),
            }
        }
        Ok(format!("Announcement sent to {}/{} friends.", delivered, friends.len()))
    }
}
