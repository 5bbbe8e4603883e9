//! Gemini API client configuration.

use std::time::Duration;

use crate::AiError;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: GEMINI_API_BASE.to_string(),
            max_output_tokens: 8192,
            temperature: 0.7,
            timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self, AiError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(AiError::NotConfigured(format!(
                "Gemini API key not found. Set {var} in the environment or a .env file."
            ))),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = GeminiConfig::new("secret-key-123");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = GeminiConfig::new("k")
            .with_api_base("http://localhost:8080/models/")
            .with_max_output_tokens(256)
            .with_temperature(0.1)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_base, "http://localhost:8080/models");
        assert_eq!(config.max_output_tokens, 256);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_env_missing_is_not_configured() {
        let err = GeminiConfig::from_env("PARLEY_TEST_SURELY_UNSET_KEY").unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(ref m) if m.contains("PARLEY_TEST_SURELY_UNSET_KEY")));
    }
}
