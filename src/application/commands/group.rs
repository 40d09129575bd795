//! `/group` - list group chats

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, User};
use crate::domain::traits::ChatGateway;

pub struct GroupCommand {
    gateway: Arc<dyn ChatGateway>,
}

impl GroupCommand {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Command for GroupCommand {
    fn name(&self) -> &str {
        "/group"
    }

    fn description(&self) -> &str {
        "List group chats"
    }

    async fn execute(&self, _user: &User, _params: &[String]) -> Result<String, CommandError> {
        let rooms = self
            .gateway
            .chatrooms()
            .await
            .map_err(|e| CommandError::Gateway(e.to_string()))?;

        Ok(rooms.iter().map(|room| format!("{}\n", room.nickname)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Contact;
    use crate::test_support::RecordingGateway;

    #[tokio::test]
    async fn test_lists_one_room_per_line() {
        let gateway = Arc::new(RecordingGateway {
            rooms: vec![Contact::new("r1", "Family"), Contact::new("r2", "Rustaceans")],
            ..RecordingGateway::default()
        });
        let reply = GroupCommand::new(gateway)
            .execute(&User::new("u"), &["/group".to_string()])
            .await
            .unwrap();
        assert_eq!(reply, "Family\nRustaceans\n");
    }
}
