//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Commands: prefixed bot commands
//! - Functions: local functions the model may call
//! - Services: the conversation (function-calling) orchestration
//! - Messaging: parsing, dispatching and event routing
//! - Errors: Domain-specific errors

pub mod commands;
pub mod errors;
pub mod functions;
pub mod messaging;
pub mod services;
