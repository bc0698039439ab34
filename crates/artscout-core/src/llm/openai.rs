//! OpenAI-compatible Chat Completions provider.
//!
//! Works against any endpoint speaking the Chat Completions format; the
//! default config points it at Cerebras.

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
use crate::config::{require_api_key, LlmConfig};
use crate::error::{payload_from_body, ConfigError, PipelineError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat Completions client.
pub struct OpenAiCompatibleProvider {
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// `base_url` is the API root; `/chat/completions` is appended.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Build from config, resolving the API key from the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = require_api_key(&config.api_key, "LLM")?;
        Ok(Self::new(
            &config.base_url,
            &api_key,
            &config.model,
            Duration::from_millis(config.timeout_ms),
        ))
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_completion_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_completion_tokens: request.max_completion_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            reasoning_effort: request.reasoning_effort.as_deref(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Llm {
                message: format!("LLM request failed: {}", e.without_url()),
                status_code: None,
                payload: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Llm {
                message: format!("LLM HTTP {status}"),
                status_code: Some(status.as_u16()),
                payload: payload_from_body(&text),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| PipelineError::Llm {
            message: format!("Failed to parse LLM response: {}", e.without_url()),
            status_code: Some(status.as_u16()),
            payload: None,
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PipelineError::Llm {
                message: "LLM returned empty choices array, no content generated".to_string(),
                status_code: Some(status.as_u16()),
                payload: None,
            })?;

        let model = if chat_resp.model.is_empty() {
            self.model.clone()
        } else {
            chat_resp.model
        };

        Ok(CompletionResponse {
            text,
            model,
            usage: chat_resp.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
