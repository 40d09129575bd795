//! In-memory storage implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::entities::{ConversationRecord, Message, User};
use crate::domain::traits::Store;

/// Process-local store, used by tests and when persistence is disabled
#[derive(Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    messages: Arc<RwLock<HashMap<String, Vec<(u32, Message)>>>>,
    records: Arc<RwLock<Vec<ConversationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub async fn records(&self) -> Vec<ConversationRecord> {
        self.records.read().await.clone()
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    pub async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StorageError> {
        let messages = self.messages.read().await;
        let mut stored = messages.get(conversation_id).cloned().unwrap_or_default();
        stored.sort_by_key(|(seq, _)| *seq);
        Ok(stored.into_iter().map(|(_, m)| m).collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_message(&self, message: &Message, conversation_id: &str, seq: u32) -> Result<(), StorageError> {
        let mut messages = self.messages.write().await;
        messages
            .entry(conversation_id.to_string())
            .or_insert_with(Vec::new)
            .push((seq, message.clone()));
        Ok(())
    }

    async fn save_exchange(&self, record: &ConversationRecord) -> Result<(), StorageError> {
        // One write lock for the whole record keeps concurrent exchanges from interleaving
        let mut records = self.records.write().await;
        for (seq, message) in record.messages.iter().enumerate() {
            self.save_message(message, &record.id, seq as u32).await?;
        }
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_messages_keep_order() {
        let store = MemoryStore::new();
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        let record = ConversationRecord::new(
            "u1",
            vec![Message::system("s"), Message::user("q"), Message::assistant("a")],
        );
        store.save_exchange(&record).await.unwrap();

        let messages = store.get_messages(&record.id).await.unwrap();
        assert_eq!(messages, record.messages);
        assert_eq!(store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_user_upserts() {
        let store = MemoryStore::new();
        store.save_user(&User::new("u1")).await.unwrap();
        store.save_user(&User::new("u1").with_nickname("Ann")).await.unwrap();

        let user = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(user.nickname.as_deref(), Some("Ann"));
        assert_eq!(store.get_user("nobody").await.unwrap(), None);
    }
}
