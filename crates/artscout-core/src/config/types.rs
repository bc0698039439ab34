//! Sub-configuration structs with defaults matching the hosted providers.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Listen port (the `PORT` env var overrides this)
    pub port: u16,

    /// Maximum accepted upload size in megabytes
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            max_upload_mb: 20,
        }
    }
}

impl ServerConfig {
    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Image host (imgbb) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Upload endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.imgbb.com/1/upload".to_string(),
            api_key: "${IMGBB_API_KEY}".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Reverse-image-search (SerpApi) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint
    pub endpoint: String,

    /// SerpApi engine name
    pub engine: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Ask the provider to bypass its result cache
    pub no_cache: bool,

    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,

    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search".to_string(),
            engine: "google_lens".to_string(),
            api_key: "${SERPAPI_KEY}".to_string(),
            no_cache: true,
            timeout_ms: 60_000,
            max_attempts: 3,
            retry_delay_ms: 2_000,
        }
    }
}

/// LLM provider settings (any OpenAI-compatible chat completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended (`LLM_BASE_URL` overrides this)
    pub base_url: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Reasoning effort hint ("low", "medium", "high")
    pub reasoning_effort: String,

    /// Response cap in tokens
    pub max_completion_tokens: u32,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cerebras.ai/v1".to_string(),
            api_key: "${CEREBRAS_API_KEY}".to_string(),
            model: "gpt-oss-120b".to_string(),
            temperature: 1.0,
            top_p: 1.0,
            reasoning_effort: "low".to_string(),
            max_completion_tokens: 32_768,
            timeout_ms: 120_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
