//! Parley configuration system.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ParleyConfig, CONFIG_SCHEMA_VERSION};

use parley_common::ConfigError;
use std::path::Path;

/// Load config from `path` if given, otherwise from the platform default
/// path, then validate strictly.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
