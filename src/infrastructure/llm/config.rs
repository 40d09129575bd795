//! LLM Configuration

use serde::{Deserialize, Serialize};

/// LLM Provider type. Both speak the OpenAI chat-completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    OpenAI,
    Groq,
}

impl LLMProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "gpt-3.5-turbo-0613",
            LLMProvider::Groq => "llama-3.3-70b-versatile",
        }
    }
}

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// HTTP(S) proxy for provider calls
    pub proxy: Option<String>,
    /// Persona sent as the system message
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Deadline for a single provider call
    pub timeout_seconds: u64,
    /// Cap on provider calls in flight
    pub max_concurrent_requests: usize,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            api_key: None,
            base_url: None,
            model: None,
            proxy: None,
            system_prompt: "You are a helpful assistant.".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_seconds: 60,
            max_concurrent_requests: 4,
        }
    }
}

impl LLMConfig {
    /// Overlay environment variables onto an existing config
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Ok(proxy) = std::env::var("OPENAI_PROXY") {
            self.proxy = Some(proxy);
        }
        if let Ok(prompt) = std::env::var("LLM_SYSTEM_PROMPT") {
            self.system_prompt = prompt;
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_provider() {
        let mut config = LLMConfig::default();
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert_eq!(config.model(), "gpt-3.5-turbo-0613");

        config.provider = LLMProvider::Groq;
        config.model = Some("llama-3.1-8b-instant".to_string());
        assert_eq!(config.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(config.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config: LLMConfig = serde_yaml::from_str("provider: groq\ntimeout-seconds: 5\n").unwrap();
        assert_eq!(config.provider, LLMProvider::Groq);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_concurrent_requests, 4);
    }
}
