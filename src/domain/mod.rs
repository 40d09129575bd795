//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, events)
//! - Traits: Abstractions for infrastructure (ChatGateway, Store, services)

pub mod entities;
pub mod traits;
