//! Artscout Core - search-and-analysis pipeline for painting identification.
//!
//! Artscout takes a photograph of a painting and returns visually similar
//! images found on the web plus an LLM-generated identification of the
//! artist and artwork.
//!
//! # Architecture
//!
//! Each request runs one pipeline, stages strictly in sequence:
//!
//! ```text
//! Image → Upload (imgbb) → Reverse search (SerpApi, retried) → Prompt → LLM → JSON
//! ```
//!
//! External services sit behind traits ([`ImageHost`], [`ReverseImageSearch`],
//! [`LlmProvider`]) so the [`Orchestrator`] can be built with fakes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use artscout_core::{Config, ImageBuffer, Orchestrator, SearchResponse};
//!
//! #[tokio::main]
//! async fn main() -> artscout_core::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!
//!     let bytes = std::fs::read("./painting.jpg")?;
//!     let outcome = orchestrator.run(ImageBuffer::new(bytes)).await?;
//!     println!("{}", serde_json::to_string_pretty(&SearchResponse::from(outcome))?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod host;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod retry;
pub mod search;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ArtscoutError, ConfigError, PipelineError, PipelineResult, Result, Stage};
pub use host::{ImageHost, ImgbbHost};
pub use llm::{Analyzer, LlmProvider, OpenAiCompatibleProvider};
pub use output::{ErrorResponse, SearchResponse};
pub use pipeline::Orchestrator;
pub use prompt::build_prompt;
pub use retry::{retry_with_policy, Backoff, RetryPolicy};
pub use search::{search_with_retry, ReverseImageSearch, SerpApiClient};
pub use types::{
    AnalysisResult, HostedImageUrl, ImageBuffer, SearchContext, SearchOutcome, TimingReport,
    VisualMatch,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
