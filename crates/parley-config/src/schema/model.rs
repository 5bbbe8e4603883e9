//! Model selection and generation parameters.

use parley_common::ModelVariant;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Variant selected at startup.
    pub variant: ModelVariant,
    /// Provider model name behind the `flash` variant.
    pub flash_model: String,
    /// Provider model name behind the `pro` variant.
    pub pro_model: String,
    /// Valid range: 1-65536.
    pub max_output_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::Flash,
            flash_model: "gemini-2.5-flash".into(),
            pro_model: "gemini-2.5-pro".into(),
            max_output_tokens: 8192,
            temperature: 0.7,
            api_base: DEFAULT_API_BASE.into(),
            api_key_env: "GEMINI_API_KEY".into(),
            request_timeout_secs: 120,
        }
    }
}
