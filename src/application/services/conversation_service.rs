//! Conversation service - one model exchange with at most one function round trip

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::application::errors::{ConversationError, FunctionError};
use crate::application::functions::FunctionTable;
use crate::domain::entities::{FunctionDescriptor, Message};
use crate::infrastructure::llm::{FunctionCallPolicy, LLMConfig, LLMResponse, LLM};

/// Result of a conversation: the reply plus every message in call order
#[derive(Debug, Clone)]
pub struct Exchange {
    pub reply: String,
    /// system, user, [assistant call, function result], final assistant
    pub messages: Vec<Message>,
    /// Name of the function executed during the exchange, if any
    pub function: Option<String>,
}

/// Builds the model request, runs the (single) function round trip, returns the final text.
///
/// Only one round trip is ever made: a function call requested by the final
/// response is logged and dropped, never executed.
pub struct ConversationService {
    llm: Arc<dyn LLM>,
    functions: FunctionTable,
    persona: String,
    call_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl ConversationService {
    pub fn new(llm: Arc<dyn LLM>, functions: FunctionTable, persona: impl Into<String>) -> Self {
        Self {
            llm,
            functions,
            persona: persona.into(),
            call_timeout: Duration::from_secs(60),
            permits: Arc::new(Semaphore::new(4)),
        }
    }

    pub fn from_config(llm: Arc<dyn LLM>, functions: FunctionTable, config: &LLMConfig) -> Self {
        Self::new(llm, functions, config.system_prompt.clone())
            .with_timeout(Duration::from_secs(config.timeout_seconds))
            .with_max_concurrent(config.max_concurrent_requests)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub async fn respond(&self, text: &str) -> Result<Exchange, ConversationError> {
        let mut messages = vec![Message::system(&self.persona), Message::user(text)];
        let descriptors = self.functions.descriptors();

        let first = self
            .call_model(messages.clone(), &descriptors, Some(FunctionCallPolicy::Auto))
            .await?;

        let Some(call) = first.function_call else {
            let reply = first.content.unwrap_or_default();
            messages.push(Message::assistant(reply.clone()));
            return Ok(Exchange {
                reply,
                messages,
                function: None,
            });
        };

        tracing::info!("Model requested function: {}", call.name);
        let function = self
            .functions
            .get(&call.name)
            .ok_or_else(|| ConversationError::UnknownFunction(call.name.clone()))?;

        let args: serde_json::Value = serde_json::from_str(&call.arguments).map_err(|e| {
            ConversationError::MalformedArguments {
                function: call.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let result = function.call(args).map_err(|e| match e {
            FunctionError::InvalidArguments(reason) => ConversationError::MalformedArguments {
                function: call.name.clone(),
                reason,
            },
            other => ConversationError::FunctionFailed {
                function: call.name.clone(),
                reason: other.to_string(),
            },
        })?;
        tracing::debug!("{} -> {}", call.name, result);

        let name = call.name.clone();
        messages.push(Message::assistant_call(first.content, call));
        messages.push(Message::function(name.clone(), result));

        let second = self.call_model(messages.clone(), &[], None).await?;
        if let Some(extra) = &second.function_call {
            tracing::warn!("Ignoring second function call request: {}", extra.name);
        }

        let reply = second.content.unwrap_or_default();
        messages.push(Message::assistant(reply.clone()));
        Ok(Exchange {
            reply,
            messages,
            function: Some(name),
        })
    }

    async fn call_model(
        &self,
        messages: Vec<Message>,
        functions: &[FunctionDescriptor],
        policy: Option<FunctionCallPolicy>,
    ) -> Result<LLMResponse, ConversationError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ConversationError::PoolClosed)?;

        let response = match tokio::time::timeout(self.call_timeout, self.llm.chat(messages, functions, policy)).await {
            Ok(response) => response?,
            Err(_) => return Err(ConversationError::Timeout(self.call_timeout)),
        };

        if let Some(usage) = &response.usage {
            tracing::debug!(
                "{} finished ({:?}), tokens: {:?} prompt, {:?} completion, {:?} total",
                response.model,
                response.finish_reason,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        Ok(response)
    }
}
