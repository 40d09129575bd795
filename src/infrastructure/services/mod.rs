//! HTTP clients for the weather and picture services

pub mod amap;
pub mod emoji;

pub use amap::AmapClient;
pub use emoji::EmojiClient;

use reqwest::{Client, Response};
use std::time::Duration;

use crate::application::errors::ServiceError;

fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Anything but 2xx is an error; the body is not inspected
fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}
