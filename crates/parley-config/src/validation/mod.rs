//! Full configuration validation.
//!
//! Each section has its own validator; all errors are collected into a
//! single `ConfigError`.

mod helpers;


use crate::schema::{ChatConfig, ModelConfig, ParleyConfig};
use helpers::{validate_non_empty, validate_range, validate_range_f64};
use parley_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, &config.model);
    validate_chat(&mut errors, &config.chat);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, model: &ModelConfig) {
    validate_non_empty(errors, "model.flash_model", &model.flash_model);
    validate_non_empty(errors, "model.pro_model", &model.pro_model);
    validate_non_empty(errors, "model.api_base", &model.api_base);
    validate_non_empty(errors, "model.api_key_env", &model.api_key_env);
    validate_range(errors, "model.max_output_tokens", model.max_output_tokens as u64, 1, 65536);
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range(errors, "model.request_timeout_secs", model.request_timeout_secs, 1, 3600);
}

fn validate_chat(errors: &mut Vec<String>, chat: &ChatConfig) {
    validate_non_empty(errors, "chat.greeting", &chat.greeting);
    validate_non_empty(errors, "chat.error_text", &chat.error_text);
    validate_non_empty(errors, "chat.default_image_prompt", &chat.default_image_prompt);
    if chat.max_image_bytes == 0 {
        errors.push("chat.max_image_bytes must be greater than 0".into());
    }
    if chat.max_input_len == 0 {
        errors.push("chat.max_input_len must be greater than 0".into());
    }
}
