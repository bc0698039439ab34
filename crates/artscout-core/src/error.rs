//! Error types for the Artscout search-and-analysis pipeline.
//!
//! Pipeline errors are tagged by the stage that produced them and carry the
//! upstream provider's payload when one was returned, so the HTTP layer can
//! surface it verbatim in the `details` field.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Top-level error type for Artscout operations.
#[derive(Error, Debug)]
pub enum ArtscoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// An API key is neither set inline nor resolvable from the environment
    #[error("{provider} API key not set. Set the {hint} env var.")]
    MissingCredential { provider: String, hint: String },
}

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Search,
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Search => "search",
            Stage::Analysis => "analysis",
        };
        f.write_str(name)
    }
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image host rejected the upload or could not be reached
    #[error("Upload failed: {message}")]
    Upload {
        message: String,
        status_code: Option<u16>,
        payload: Option<Value>,
    },

    /// A single reverse-image-search attempt failed
    #[error("Search attempt failed: {message}")]
    Search {
        message: String,
        status_code: Option<u16>,
        payload: Option<Value>,
    },

    /// Every reverse-image-search attempt failed
    #[error("Search failed after {attempts} attempts: {message}")]
    SearchExhausted {
        attempts: u32,
        message: String,
        payload: Option<Value>,
    },

    /// LLM completion call failed
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
        payload: Option<Value>,
    },
}

impl PipelineError {
    /// Stage tag for this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Upload { .. } => Stage::Upload,
            PipelineError::Search { .. } | PipelineError::SearchExhausted { .. } => Stage::Search,
            PipelineError::Llm { .. } => Stage::Analysis,
        }
    }

    /// Upstream payload if the provider sent one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            PipelineError::Upload { payload, .. }
            | PipelineError::Search { payload, .. }
            | PipelineError::SearchExhausted { payload, .. }
            | PipelineError::Llm { payload, .. } => payload.as_ref(),
        }
    }

    /// Value for the `details` field of an error response: the upstream
    /// payload when available, otherwise the error message.
    pub fn details(&self) -> Value {
        match self.payload() {
            Some(payload) => payload.clone(),
            None => Value::String(self.message().to_string()),
        }
    }

    /// The bare error message without the stage prefix.
    pub fn message(&self) -> &str {
        match self {
            PipelineError::Upload { message, .. }
            | PipelineError::Search { message, .. }
            | PipelineError::SearchExhausted { message, .. }
            | PipelineError::Llm { message, .. } => message,
        }
    }
}

/// Convenience type alias for Artscout results.
pub type Result<T> = std::result::Result<T, ArtscoutError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Parse an upstream error body, keeping it as a JSON string when it isn't JSON.
pub(crate) fn payload_from_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_tags() {
        let upload = PipelineError::Upload {
            message: "boom".into(),
            status_code: None,
            payload: None,
        };
        let exhausted = PipelineError::SearchExhausted {
            attempts: 3,
            message: "boom".into(),
            payload: None,
        };
        let llm = PipelineError::Llm {
            message: "boom".into(),
            status_code: Some(500),
            payload: None,
        };
        assert_eq!(upload.stage(), Stage::Upload);
        assert_eq!(exhausted.stage(), Stage::Search);
        assert_eq!(llm.stage(), Stage::Analysis);
        assert_eq!(llm.stage().to_string(), "analysis");
    }

    #[test]
    fn test_details_prefers_payload() {
        let err = PipelineError::Upload {
            message: "HTTP 400".into(),
            status_code: Some(400),
            payload: Some(json!({"error": {"message": "Invalid API v1 key."}})),
        };
        assert_eq!(err.details()["error"]["message"], "Invalid API v1 key.");
    }

    #[test]
    fn test_details_falls_back_to_message() {
        let err = PipelineError::SearchExhausted {
            attempts: 3,
            message: "connection refused".into(),
            payload: None,
        };
        assert_eq!(err.details(), json!("connection refused"));
        assert!(err.to_string().contains("after 3 attempts"));
    }

    #[test]
    fn test_payload_from_body() {
        assert_eq!(payload_from_body(""), None);
        assert_eq!(payload_from_body(r#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(payload_from_body("Bad Gateway"), Some(json!("Bad Gateway")));
    }
}
