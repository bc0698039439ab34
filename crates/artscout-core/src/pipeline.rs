//! Pipeline orchestrator.
//!
//! Runs upload, search, prompt build and analysis strictly in sequence for
//! one image, timing each stage. The first failing stage ends the run.
//!
//! ```text
//! ImageBuffer → Upload → HostedImageUrl → Search (retry) → Prompt → Analyze → SearchOutcome
//! ```

use crate::config::Config;
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::host::{ImageHost, ImgbbHost};
use crate::llm::{Analyzer, OpenAiCompatibleProvider};
use crate::prompt::build_prompt;
use crate::retry::RetryPolicy;
use crate::search::{search_with_retry, ReverseImageSearch, SerpApiClient};
use crate::types::{ImageBuffer, SearchOutcome, TimingReport};
use std::sync::Arc;
use tokio::time::Instant;

/// Composes the pipeline stages. Holds only read-only collaborators, so one
/// instance serves any number of concurrent requests.
#[derive(Clone)]
pub struct Orchestrator {
    host: Arc<dyn ImageHost>,
    search: Arc<dyn ReverseImageSearch>,
    analyzer: Analyzer,
    retry_policy: RetryPolicy,
}

impl Orchestrator {
    pub fn new(
        host: Arc<dyn ImageHost>,
        search: Arc<dyn ReverseImageSearch>,
        analyzer: Analyzer,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            host,
            search,
            analyzer,
            retry_policy,
        }
    }

    /// Build the production pipeline (imgbb, SerpApi, OpenAI-compatible LLM).
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let host = ImgbbHost::from_config(&config.upload)?;
        let search = SerpApiClient::from_config(&config.search)?;
        let provider = OpenAiCompatibleProvider::from_config(&config.llm)?;

        tracing::debug!(
            "Pipeline configured: search {} attempts / {}ms delay, model {}",
            config.search.max_attempts,
            config.search.retry_delay_ms,
            config.llm.model
        );

        Ok(Self::new(
            Arc::new(host),
            Arc::new(search),
            Analyzer::new(Arc::new(provider), config.llm.clone()),
            RetryPolicy::from(&config.search),
        ))
    }

    /// Run every stage for one image.
    pub async fn run(&self, image: ImageBuffer) -> PipelineResult<SearchOutcome> {
        let total_start = Instant::now();
        tracing::info!(
            "File: {} ({:.1}KB)",
            image.file_name.as_deref().unwrap_or("<unnamed>"),
            image.size() as f64 / 1024.0
        );

        // Stage 1: upload
        let stage_start = Instant::now();
        tracing::info!("[1/3] Uploading to {}...", self.host.name());
        let image_url = self.host.upload(&image).await.inspect_err(log_failure)?;
        drop(image);
        let upload = stage_start.elapsed();
        tracing::info!("[1/3] Upload: {}ms - {image_url}", upload.as_millis());

        // Stage 2: reverse image search
        let stage_start = Instant::now();
        tracing::info!("[2/3] Searching with {}...", self.search.name());
        let (context, search_retries) =
            search_with_retry(self.search.as_ref(), &image_url, &self.retry_policy)
                .await
                .inspect_err(log_failure)?;
        let search = stage_start.elapsed();
        tracing::info!(
            "[2/3] Search: {}ms - {} results (retries: {search_retries})",
            search.as_millis(),
            context.visual_matches.len()
        );

        // Stages 3 + 4: prompt and analysis
        let stage_start = Instant::now();
        tracing::info!("[3/3] Analyzing with LLM...");
        let prompt = build_prompt(
            &context.visual_matches,
            context.visual_matches.len(),
            &context,
        );
        tracing::debug!(
            "  [LLM] Prompt: {} chars (~{} tokens), built in {}ms",
            prompt.len(),
            prompt.len() / 4,
            stage_start.elapsed().as_millis()
        );
        let analysis = self
            .analyzer
            .analyze(&prompt)
            .await
            .inspect_err(log_failure)?;
        let analysis_time = stage_start.elapsed();
        tracing::info!("[3/3] LLM analysis: {}ms", analysis_time.as_millis());

        let timing = TimingReport {
            upload,
            search,
            search_retries,
            analysis: analysis_time,
            total: total_start.elapsed(),
        };
        tracing::info!(
            "TOTAL: {}ms (upload: {}ms + search: {}ms + analysis: {}ms)",
            timing.total.as_millis(),
            timing.upload.as_millis(),
            timing.search.as_millis(),
            timing.analysis.as_millis()
        );

        Ok(SearchOutcome {
            image_url,
            timing,
            analysis,
            matches: context.visual_matches,
        })
    }
}

fn log_failure(e: &PipelineError) {
    tracing::error!(stage = %e.stage(), details = %e.details(), "Search error: {e}");
}
