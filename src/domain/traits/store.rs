use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::{ConversationRecord, Message, User};

/// Store trait - abstraction for data persistence. Writes are append/upsert only.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create tables; calling it again is not an error
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    // User operations
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;

    // Message operations
    async fn save_message(&self, message: &Message, conversation_id: &str, seq: u32) -> Result<(), StorageError>;

    /// Persist a whole exchange, messages in record order
    async fn save_exchange(&self, record: &ConversationRecord) -> Result<(), StorageError>;
}
