//! LLM integration for artwork identification.
//!
//! Provides a provider abstraction over OpenAI-compatible chat endpoints and
//! the analyzer that turns a prompt into a structured identification.

pub(crate) mod analyzer;
pub(crate) mod openai;
pub(crate) mod parse;
pub(crate) mod provider;

pub use analyzer::Analyzer;
pub use openai::OpenAiCompatibleProvider;
pub use parse::parse_analysis;
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
