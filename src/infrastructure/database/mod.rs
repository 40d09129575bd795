//! SQLite persistence for users, messages and exchanges

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::application::errors::StorageError;
use crate::domain::entities::{ConversationRecord, Message, User};
use crate::domain::traits::Store;

/// Tables are created with plain `CREATE TABLE`; an existing table is reported
/// as [`StorageError::SchemaExists`] and skipped by `ensure_schema`.
const SCHEMA: [(&str, &str); 4] = [
    (
        "users",
        "CREATE TABLE users (
            id TEXT PRIMARY KEY,
            region TEXT,
            city TEXT,
            nickname TEXT
        )",
    ),
    (
        "chats",
        "CREATE TABLE chats (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "messages",
        "CREATE TABLE messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT,
            function_name TEXT,
            function_arguments TEXT,
            seq INTEGER NOT NULL
        )",
    ),
    (
        "idx_messages_conversation",
        "CREATE INDEX idx_messages_conversation ON messages(conversation_id, seq)",
    ),
];

/// SQLite store. One connection behind a mutex, so writes are serialized.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking database work off the async runtime
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StorageError::Join(e.to_string()))?
    }
}

/// Bundled SQLite reports this as `SqlInputError`, older builds as `SqliteFailure`
fn is_already_exists(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqlInputError { msg, .. } => msg.contains("already exists"),
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.contains("already exists"),
        other => other.to_string().contains("already exists"),
    }
}

fn create_table(conn: &Connection, name: &str, sql: &str) -> Result<(), StorageError> {
    match conn.execute(sql, []) {
        Ok(_) => Ok(()),
        Err(e) if is_already_exists(&e) => Err(StorageError::SchemaExists(name.to_string())),
        Err(e) => Err(e.into()),
    }
}

fn insert_message(conn: &Connection, message: &Message, conversation_id: &str, seq: u32) -> rusqlite::Result<()> {
    let (function_name, function_arguments) = match (&message.function_call, &message.name) {
        (Some(call), _) => (Some(call.name.as_str()), Some(call.arguments.as_str())),
        (None, Some(name)) => (Some(name.as_str()), None),
        (None, None) => (None, None),
    };

    conn.execute(
        "INSERT INTO messages (conversation_id, role, content, function_name, function_arguments, seq)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            conversation_id,
            message.role.as_str(),
            message.content,
            function_name,
            function_arguments,
            seq
        ],
    )?;
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            for (name, sql) in SCHEMA {
                match create_table(conn, name, sql) {
                    Ok(()) => tracing::info!("Created {}", name),
                    Err(StorageError::SchemaExists(name)) => tracing::debug!("{} already exists", name),
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        })
        .await
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let user = user.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (id, region, city, nickname) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    region = excluded.region,
                    city = excluded.city,
                    nickname = excluded.nickname",
                params![user.id, user.region, user.city, user.nickname],
            )?;
            Ok(())
        })
        .await
    }

    async fn save_message(&self, message: &Message, conversation_id: &str, seq: u32) -> Result<(), StorageError> {
        let message = message.clone();
        let conversation_id = conversation_id.to_string();
        self.with_conn(move |conn| {
            insert_message(conn, &message, &conversation_id, seq)?;
            Ok(())
        })
        .await
    }

    async fn save_exchange(&self, record: &ConversationRecord) -> Result<(), StorageError> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO chats (id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![record.id, record.user_id, record.created_at.to_rfc3339()],
            )?;
            for (seq, message) in record.messages.iter().enumerate() {
                insert_message(&tx, message, &record.id, seq as u32)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }
}

/// Read side, only needed to check what was written
#[cfg(test)]
mod read {
    use rusqlite::types::Type;
    use rusqlite::OptionalExtension;

    use super::*;
    use crate::domain::entities::{FunctionCall, Role};

    impl SqliteStore {
        pub async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
            let id = id.to_string();
            self.with_conn(move |conn| {
                let user = conn
                    .query_row(
                        "SELECT id, region, city, nickname FROM users WHERE id = ?1",
                        [&id],
                        |row| {
                            Ok(User {
                                id: row.get(0)?,
                                region: row.get(1)?,
                                city: row.get(2)?,
                                nickname: row.get(3)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(user)
            })
            .await
        }

        pub async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StorageError> {
            let conversation_id = conversation_id.to_string();
            self.with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT role, content, function_name, function_arguments FROM messages
                     WHERE conversation_id = ?1 ORDER BY seq, id",
                )?;
                let rows = stmt.query_map([&conversation_id], |row| {
                    let role: String = row.get(0)?;
                    let role: Role = serde_json::from_value(serde_json::Value::String(role))
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
                    Ok(row_to_message(role, row.get(1)?, row.get(2)?, row.get(3)?))
                })?;

                let messages = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(messages)
            })
            .await
        }
    }

    fn row_to_message(
        role: Role,
        content: Option<String>,
        function_name: Option<String>,
        function_arguments: Option<String>,
    ) -> Message {
        match (role, function_name, function_arguments) {
            (Role::Assistant, Some(name), Some(arguments)) => {
                Message::assistant_call(content, FunctionCall { name, arguments })
            }
            (Role::Function, Some(name), _) => Message::function(name, content.unwrap_or_default()),
            (role, _, _) => Message {
                role,
                content,
                name: None,
                function_call: None,
            },
        }
    }
}
