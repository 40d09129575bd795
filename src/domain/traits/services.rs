use async_trait::async_trait;

use crate::application::errors::ServiceError;

/// Geocoding and live weather lookup. Payloads are returned raw so callers
/// decide how to treat missing fields.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Resolve an address; expected shape `{"geocodes": [{"adcode": ".."}]}`
    async fn geocode(&self, address: &str) -> Result<serde_json::Value, ServiceError>;

    /// Current weather by area code; expected shape `{"lives": [{..}]}`
    async fn live_weather(&self, adcode: &str) -> Result<serde_json::Value, ServiceError>;
}

/// Random picture source
#[async_trait]
pub trait PictureService: Send + Sync {
    /// Descriptor payload; expected shape `{"text": "<image url>"}`
    async fn random_descriptor(&self) -> Result<serde_json::Value, ServiceError>;

    async fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}
