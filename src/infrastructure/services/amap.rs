//! Amap (restapi.amap.com) geocoding and live weather

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{build_client, check_status};
use crate::application::errors::ServiceError;
use crate::domain::traits::WeatherService;

const DEFAULT_BASE_URL: &str = "https://restapi.amap.com/v3";

pub struct AmapClient {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

impl AmapClient {
    pub fn new(key: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            key: key.into(),
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.key.as_str())])
            .query(query)
            .send()
            .await?;

        Ok(check_status(response)?.json().await?)
    }
}

#[async_trait]
impl WeatherService for AmapClient {
    async fn geocode(&self, address: &str) -> Result<Value, ServiceError> {
        self.get("geocode/geo", &[("address", address)]).await
    }

    async fn live_weather(&self, adcode: &str) -> Result<Value, ServiceError> {
        self.get("weather/weatherInfo", &[("city", adcode), ("extensions", "base")])
            .await
    }
}
