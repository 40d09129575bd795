//! Fakes shared by unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::errors::{BotError, ServiceError};
use crate::domain::entities::{FunctionDescriptor, Message};
use crate::domain::traits::{ChatGateway, Contact, GatewayInfo, PictureService, WeatherService};
use crate::infrastructure::llm::{FunctionCallPolicy, LLMError, LLMResponse, LLMResult, LLM};

/// One provider call as seen by [`ScriptedLLM`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub functions: Vec<String>,
    pub policy: Option<FunctionCallPolicy>,
}

/// LLM that replays queued responses and records every request
#[derive(Default)]
pub struct ScriptedLLM {
    responses: Mutex<VecDeque<LLMResult<LLMResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedLLM {
    pub fn new(responses: Vec<LLMResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    pub fn failing(err: LLMError) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(err)])),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Most `chat` calls ever running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        functions: &[FunctionDescriptor],
        policy: Option<FunctionCallPolicy>,
    ) -> LLMResult<LLMResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages,
            functions: functions.iter().map(|f| f.name.clone()).collect(),
            policy,
        });
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::ApiError("script exhausted".to_string())))
    }
}

/// Gateway that records what would have been sent
#[derive(Default)]
pub struct RecordingGateway {
    pub friends: Vec<Contact>,
    pub rooms: Vec<Contact>,
    pub texts: Mutex<Vec<(String, String)>>,
    pub images: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingGateway {
    pub fn texts(&self) -> Vec<(String, String)> {
        self.texts.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<(String, PathBuf)> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), BotError> {
        self.texts
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_image(&self, conversation_id: &str, path: &Path) -> Result<(), BotError> {
        self.images
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), path.to_path_buf()));
        Ok(())
    }

    async fn friends(&self) -> Result<Vec<Contact>, BotError> {
        Ok(self.friends.clone())
    }

    async fn chatrooms(&self) -> Result<Vec<Contact>, BotError> {
        Ok(self.rooms.clone())
    }

    fn info(&self) -> GatewayInfo {
        GatewayInfo {
            id: "test".to_string(),
            name: "test".to_string(),
            platform: "test".to_string(),
        }
    }
}

/// Weather service with fixed payloads; records the addresses it was asked for
pub struct CannedWeather {
    pub geocode: serde_json::Value,
    pub lives: serde_json::Value,
    pub addresses: Mutex<Vec<String>>,
    pub adcodes: Mutex<Vec<String>>,
    pub unreachable: bool,
}

impl CannedWeather {
    pub fn new(geocode: serde_json::Value, lives: serde_json::Value) -> Self {
        Self {
            geocode,
            lives,
            addresses: Mutex::new(Vec::new()),
            adcodes: Mutex::new(Vec::new()),
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new(serde_json::Value::Null, serde_json::Value::Null)
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherService for CannedWeather {
    async fn geocode(&self, address: &str) -> Result<serde_json::Value, ServiceError> {
        self.addresses.lock().unwrap().push(address.to_string());
        if self.unreachable {
            return Err(ServiceError::Network("connection refused".to_string()));
        }
        Ok(self.geocode.clone())
    }

    async fn live_weather(&self, adcode: &str) -> Result<serde_json::Value, ServiceError> {
        self.adcodes.lock().unwrap().push(adcode.to_string());
        Ok(self.lives.clone())
    }
}

/// Picture service returning a fixed descriptor and payload
pub struct CannedPictures {
    pub descriptor: Result<serde_json::Value, String>,
    pub bytes: Result<Vec<u8>, String>,
}

#[async_trait]
impl PictureService for CannedPictures {
    async fn random_descriptor(&self) -> Result<serde_json::Value, ServiceError> {
        self.descriptor.clone().map_err(ServiceError::Network)
    }

    async fn download(&self, _url: &str) -> Result<Vec<u8>, ServiceError> {
        self.bytes.clone().map_err(ServiceError::Network)
    }
}
