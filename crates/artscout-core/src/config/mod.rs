//! Configuration management for Artscout.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. API keys default to `${ENV_VAR}` references so a bare
//! environment is enough to run the service.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Artscout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Image host settings
    pub upload: UploadConfig,

    /// Reverse-image-search settings
    pub search: SearchConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist. Environment
    /// overrides are applied in both cases.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply process environment overrides: `PORT` and `LLM_BASE_URL`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = var("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got {port:?}"))
            })?;
        }
        if let Some(base_url) = var("LLM_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.llm.base_url = base_url.trim().to_string();
        }
        self.validate()
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.artscout.artscout/config.toml
    /// - Linux: ~/.config/artscout/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\artscout\config\config.toml
    ///
    /// Falls back to ~/.artscout/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "artscout", "artscout")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let expanded = shellexpand::tilde("~/.artscout/config.toml");
                PathBuf::from(expanded.into_owned())
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve an API key, naming the provider and env var when it is missing.
pub(crate) fn require_api_key(value: &str, provider: &str) -> Result<String, ConfigError> {
    resolve_env_var(value).ok_or_else(|| {
        let hint = value
            .strip_prefix("${")
            .and_then(|v| v.strip_suffix('}'))
            .unwrap_or("api_key")
            .to_string();
        ConfigError::MissingCredential {
            provider: provider.to_string(),
            hint,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.upload.timeout_ms, 30_000);
        assert_eq!(config.search.max_attempts, 3);
        assert_eq!(config.search.retry_delay_ms, 2_000);
        assert_eq!(config.search.timeout_ms, 60_000);
        assert_eq!(config.llm.max_completion_tokens, 32_768);
        assert_eq!(config.llm.reasoning_effort, "low");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[llm]"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nmax_attempts = 5\n\n[llm]\nmodel = \"llama-3.3-70b\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.search.max_attempts, 5);
        assert_eq!(config.search.retry_delay_ms, 2_000);
        assert_eq!(config.llm.model, "llama-3.3-70b");
        assert_eq!(config.upload.endpoint, "https://api.imgbb.com/1/upload");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nmax_attempts = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_overrides_port_and_llm_base_url() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                "PORT" => Some("8080".to_string()),
                "LLM_BASE_URL" => Some("http://localhost:11434/v1".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_overrides_ignore_blank_base_url_and_reject_bad_port() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| (name == "LLM_BASE_URL").then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(config.llm.base_url, "https://api.cerebras.ai/v1");

        let err = config
            .apply_overrides(|name| (name == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_require_api_key_names_env_var() {
        let err = require_api_key("${ARTSCOUT_TEST_UNSET_KEY}", "SerpApi").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SerpApi"));
        assert!(msg.contains("ARTSCOUT_TEST_UNSET_KEY"));
    }
}
