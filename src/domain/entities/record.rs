use chrono::{DateTime, Utc};

use super::Message;

/// One persisted exchange: the ordered messages of a single request/reply
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: String,
    pub user_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(user_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            messages,
            created_at: Utc::now(),
        }
    }
}
