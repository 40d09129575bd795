//! OpenAI-compatible provider with legacy function calling

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{FunctionCall, FunctionDescriptor, Message};
use crate::infrastructure::llm::{
    FunctionCallPolicy, LLMConfig, LLMError, LLMResponse, LLMResult, LLMUsage, LLM,
};

/// OpenAI-compatible provider (OpenAI, Groq, local gateways)
pub struct OpenAIProvider {
    api_key: String,
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIProvider {
    /// Build from config, applying the proxy if one is set
    pub fn from_config(config: &LLMConfig) -> LLMResult<Self> {
        let api_key = config.api_key.clone().ok_or(LLMError::MissingApiKey)?;

        let mut builder = Client::builder();
        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| LLMError::ConfigError(format!("invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| LLMError::ConfigError(e.to_string()))?;

        Ok(Self {
            api_key,
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "no_functions")]
    functions: &'a [FunctionDescriptor],
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCallPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

fn no_functions(functions: &&[FunctionDescriptor]) -> bool {
    functions.is_empty()
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

fn into_response(chat_response: ChatResponse, requested_model: &str) -> LLMResult<LLMResponse> {
    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::InvalidRequest("No choices in response".to_string()))?;

    let usage = chat_response.usage.map(|u| LLMUsage {
        prompt_tokens: Some(u.prompt_tokens),
        completion_tokens: Some(u.completion_tokens),
        total_tokens: Some(u.total_tokens),
    });

    Ok(LLMResponse {
        content: choice.message.content,
        function_call: choice.message.function_call,
        model: chat_response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage,
        finish_reason: choice.finish_reason,
    })
}

#[async_trait]
impl LLM for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        functions: &[FunctionDescriptor],
        policy: Option<FunctionCallPolicy>,
    ) -> LLMResult<LLMResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            functions,
            function_call: if functions.is_empty() { None } else { policy },
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            "POST {} ({} messages, {} functions)",
            self.endpoint(),
            request.messages.len(),
            functions.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        into_response(chat_response, &self.model)
    }
}
