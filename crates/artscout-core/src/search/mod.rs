//! Reverse-image-search stage.
//!
//! A provider implements one attempt; [`search_with_retry`] wraps it in the
//! retry policy and reports how many retries the successful attempt needed.

mod serpapi;

pub use serpapi::SerpApiClient;

use crate::error::{PipelineError, PipelineResult};
use crate::retry::{retry_with_policy, RetryExhausted, RetryPolicy};
use crate::types::{HostedImageUrl, SearchContext};
use async_trait::async_trait;

/// A reverse-image-search backend.
#[async_trait]
pub trait ReverseImageSearch: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run one search attempt.
    ///
    /// Any failure, including an error the provider embeds in an otherwise
    /// successful response, is returned as `PipelineError::Search`.
    async fn search_once(&self, url: &HostedImageUrl) -> PipelineResult<SearchContext>;
}

/// Search with retries. Returns the context and the retry count
/// (0 when the first attempt succeeded).
pub async fn search_with_retry(
    provider: &dyn ReverseImageSearch,
    url: &HostedImageUrl,
    policy: &RetryPolicy,
) -> PipelineResult<(SearchContext, u32)> {
    let label = format!("{} search", provider.name());
    retry_with_policy(policy, &label, |_| provider.search_once(url))
        .await
        .map(|retried| (retried.value, retried.retries))
        .map_err(exhausted)
}

fn exhausted(err: RetryExhausted<PipelineError>) -> PipelineError {
    let RetryExhausted {
        attempts,
        last_error,
    } = err;
    match last_error {
        PipelineError::Search {
            message, payload, ..
        } => PipelineError::SearchExhausted {
            attempts,
            message,
            payload,
        },
        other => PipelineError::SearchExhausted {
            attempts,
            message: other.message().to_string(),
            payload: other.payload().cloned(),
        },
    }
}
