//! Random picture API client

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{build_client, check_status};
use crate::application::errors::ServiceError;
use crate::domain::traits::PictureService;

pub struct EmojiClient {
    client: reqwest::Client,
    api_url: String,
}

impl EmojiClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl PictureService for EmojiClient {
    async fn random_descriptor(&self) -> Result<Value, ServiceError> {
        let response = self.client.get(&self.api_url).send().await?;
        Ok(check_status(response)?.json().await?)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let response = self.client.get(url).send().await?;
        let bytes = check_status(response)?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
