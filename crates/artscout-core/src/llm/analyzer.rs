//! Analysis client: one completion call, then tolerant parsing.

use super::parse::parse_analysis;
use super::provider::{CompletionRequest, LlmProvider};
use crate::config::LlmConfig;
use crate::error::PipelineError;
use crate::types::AnalysisResult;
use std::sync::Arc;

/// Turns a prompt into a structured identification.
#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn LlmProvider>,
    config: LlmConfig,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn LlmProvider>, config: LlmConfig) -> Self {
        Self { provider, config }
    }

    /// Send the prompt and parse the reply.
    ///
    /// Transport and HTTP failures abort with `PipelineError::Llm`. An
    /// unparseable reply is not an error: it yields the degraded record.
    pub async fn analyze(&self, prompt: &str) -> Result<AnalysisResult, PipelineError> {
        let request = CompletionRequest::new(prompt, &self.config);
        let response = self.provider.complete(&request).await?;

        tracing::info!(
            "  [LLM] {} call: {}ms, response {} chars (~{} tokens)",
            self.provider.name(),
            response.latency_ms,
            response.text.len(),
            response.text.len() / 4
        );
        if let Some(usage) = response.usage {
            tracing::debug!(
                "  [LLM] Actual tokens - input: {}, output: {}, total: {} ({})",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
                response.model
            );
        }

        Ok(parse_analysis(&response.text))
    }
}
