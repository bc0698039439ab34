//! Image host uploader.
//!
//! Turns raw image bytes into a publicly fetchable URL so the search
//! provider can fetch the image. A failed upload is fatal for the request
//! and is never retried.

use crate::config::{require_api_key, UploadConfig};
use crate::error::{payload_from_body, ConfigError, PipelineError, PipelineResult};
use crate::types::{HostedImageUrl, ImageBuffer};
use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;
use std::time::Duration;

/// Something that can publish an image and hand back its URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Host name for logging.
    fn name(&self) -> &str;

    /// Upload the image and return its public URL.
    async fn upload(&self, image: &ImageBuffer) -> PipelineResult<HostedImageUrl>;
}

/// imgbb uploader: base64 image in a form body, key in the query string.
pub struct ImgbbHost {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ImgbbHost {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Build from config, resolving the API key from the environment.
    pub fn from_config(config: &UploadConfig) -> Result<Self, ConfigError> {
        let api_key = require_api_key(&config.api_key, "imgbb")?;
        Ok(Self::new(
            &api_key,
            &config.endpoint,
            Duration::from_millis(config.timeout_ms),
        ))
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    fn name(&self) -> &str {
        "imgbb"
    }

    async fn upload(&self, image: &ImageBuffer) -> PipelineResult<HostedImageUrl> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .form(&[("image", encoded)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Upload {
                // The key rides in the query string; keep the URL out of the message
                message: format!("imgbb request failed: {}", e.without_url()),
                status_code: None,
                payload: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Upload {
                message: format!("imgbb HTTP {status}"),
                status_code: Some(status.as_u16()),
                payload: payload_from_body(&text),
            });
        }

        let body: Value = resp.json().await.map_err(|e| PipelineError::Upload {
            message: format!("Failed to parse imgbb response: {}", e.without_url()),
            status_code: Some(status.as_u16()),
            payload: None,
        })?;

        match body.pointer("/data/url").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Ok(HostedImageUrl::new(url)),
            _ => Err(PipelineError::Upload {
                message: "imgbb response has no data.url".to_string(),
                status_code: Some(status.as_u16()),
                payload: Some(body),
            }),
        }
    }
}
