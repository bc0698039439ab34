//! LLM provider trait and request/response types.

use crate::config::LlmConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::time::Duration;

/// A single-turn text completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Sent as the only user-role message
    pub prompt: String,
    /// Response cap in tokens
    pub max_completion_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Reasoning effort hint for reasoning models
    pub reasoning_effort: Option<String>,
}

impl CompletionRequest {
    /// Build a request with the sampling parameters from config.
    pub fn new(prompt: impl Into<String>, config: &LlmConfig) -> Self {
        Self {
            prompt: prompt.into(),
            max_completion_tokens: config.max_completion_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            reasoning_effort: Some(config.reasoning_effort.clone())
                .filter(|effort| !effort.is_empty()),
        }
    }
}

/// Token usage as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The response from a completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, untrimmed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the orchestrator holds an `Arc<dyn LlmProvider>`).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run one completion. Never retried by callers.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, PipelineError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}
