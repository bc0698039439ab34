//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Upper bound for `server.max_upload_mb`.
const MAX_UPLOAD_MB: usize = 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if !(1..=MAX_UPLOAD_MB).contains(&self.server.max_upload_mb) {
            return Err(ConfigError::ValidationError(format!(
                "server.max_upload_mb must be between 1 and {MAX_UPLOAD_MB}"
            )));
        }
        if self.upload.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "upload.timeout_ms must be > 0".into(),
            ));
        }
        if self.search.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "search.timeout_ms must be > 0".into(),
            ));
        }
        if self.search.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_attempts must be > 0".into(),
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0".into(),
            ));
        }
        if self.llm.max_completion_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_completion_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ConfigError::ValidationError(
                "llm.top_p must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}
