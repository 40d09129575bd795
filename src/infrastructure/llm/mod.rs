//! LLM integration - OpenAI-compatible chat completions with function calling

pub mod traits;
pub mod config;
pub mod providers;

pub use traits::{FunctionCallPolicy, LLM, LLMResponse, LLMError, LLMResult, LLMUsage};
pub use config::LLMConfig;
pub use providers::OpenAIProvider;
