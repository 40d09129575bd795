//! Application layer errors

use std::time::Duration;
use thiserror::Error;

use crate::infrastructure::llm::LLMError;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command registration and execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command already registered: {0}")]
    Duplicate(String),

    #[error("Invalid command name: {0:?}")]
    InvalidName(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Gateway error: {0}")]
    Gateway(String),
}

/// Errors raised by the function-calling conversation
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Model requested unknown function: {0}")]
    UnknownFunction(String),

    #[error("Malformed arguments for {function}: {reason}")]
    MalformedArguments { function: String, reason: String },

    #[error("Function {function} failed: {reason}")]
    FunctionFailed { function: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(#[from] LLMError),

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider pool closed")]
    PoolClosed,
}

/// Errors from local functions exposed to the model
#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("Function already registered: {0}")]
    Duplicate(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    Failed(String),
}

/// Failures talking to third-party HTTP services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(err.to_string())
        } else if err.is_decode() {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Table already exists: {0}")]
    SchemaExists(String),

    #[error("Lock poisoned")]
    Poisoned,

    #[error("Background task failed: {0}")]
    Join(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
