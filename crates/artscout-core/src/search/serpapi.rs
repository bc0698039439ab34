//! SerpApi Google Lens client.

use super::ReverseImageSearch;
use crate::config::{require_api_key, SearchConfig};
use crate::error::{payload_from_body, ConfigError, PipelineError, PipelineResult};
use crate::types::{HostedImageUrl, SearchContext, VisualMatch};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// SerpApi reverse-image-search client.
pub struct SerpApiClient {
    api_key: String,
    endpoint: String,
    engine: String,
    no_cache: bool,
    timeout: Duration,
    client: reqwest::Client,
}

impl SerpApiClient {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            engine: "google_lens".to_string(),
            no_cache: true,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Build from config, resolving the API key from the environment.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ConfigError> {
        let api_key = require_api_key(&config.api_key, "SerpApi")?;
        let mut client = Self::new(
            &api_key,
            &config.endpoint,
            Duration::from_millis(config.timeout_ms),
        );
        client.engine = config.engine.clone();
        client.no_cache = config.no_cache;
        Ok(client)
    }

    fn failure(message: String, status_code: Option<u16>, payload: Option<Value>) -> PipelineError {
        PipelineError::Search {
            message,
            status_code,
            payload,
        }
    }
}

#[async_trait]
impl ReverseImageSearch for SerpApiClient {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn search_once(&self, url: &HostedImageUrl) -> PipelineResult<SearchContext> {
        let no_cache = if self.no_cache { "true" } else { "false" };

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", self.engine.as_str()),
                ("url", url.as_str()),
                ("api_key", self.api_key.as_str()),
                ("no_cache", no_cache),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors print the request URL, which carries the API key
                Self::failure(
                    format!("SerpApi request failed: {}", e.without_url()),
                    None,
                    None,
                )
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            Self::failure(
                format!("Failed to read SerpApi response: {}", e.without_url()),
                Some(status.as_u16()),
                None,
            )
        })?;

        if !status.is_success() {
            return Err(Self::failure(
                format!("SerpApi HTTP {status}"),
                Some(status.as_u16()),
                payload_from_body(&text),
            ));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            Self::failure(
                format!("Failed to parse SerpApi response: {e}"),
                Some(status.as_u16()),
                payload_from_body(&text),
            )
        })?;

        // SerpApi reports some failures as HTTP 200 with an `error` field
        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            let detail = error.as_str().map(String::from).unwrap_or_else(|| error.to_string());
            return Err(Self::failure(
                format!("SerpApi error: {detail}"),
                Some(status.as_u16()),
                Some(body),
            ));
        }

        Ok(context_from_payload(&body))
    }
}

/// Pull the visual matches and auxiliary context out of a Google Lens payload.
pub(crate) fn context_from_payload(body: &Value) -> SearchContext {
    let visual_matches = body
        .get("visual_matches")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    // Keep non-object entries as blanks so ranks stay aligned
                    serde_json::from_value::<VisualMatch>(item.clone()).unwrap_or_else(|e| {
                        tracing::debug!("Blank visual match for malformed entry: {e}");
                        VisualMatch::default()
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let text_at = |pointer: &str| {
        body.pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    SearchContext {
        visual_matches,
        extracted_text: text_at("/text_results/0/text"),
        best_guess_label: text_at("/knowledge_graph/0/title"),
        categories: text_at("/knowledge_graph/0/subtitle"),
    }
}
