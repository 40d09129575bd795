//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database / Storage: Persistence (SQLite, in-memory)
//! - LLM: Chat-completions providers
//! - Services: HTTP clients for weather and pictures
//! - Adapters: Chat platform integrations

pub mod adapters;
pub mod config;
pub mod database;
pub mod llm;
pub mod services;
pub mod storage;
