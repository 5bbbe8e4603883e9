//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use parley_common::{ConfigError, ModelVariant};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_parley_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[model]
variant = "pro"
temperature = 0.2

[chat]
greeting = "Hi there"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.variant, ModelVariant::Pro);
    assert_eq!(config.model.temperature, 0.2);
    assert_eq!(config.chat.greeting, "Hi there");
    // Defaults preserved
    assert_eq!(config.model.flash_model, "gemini-2.5-flash");
    assert_eq!(config.chat.default_image_prompt, "What is in this image?");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_unknown_variant_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[model]\nvariant = \"ultra\"\n").unwrap();

    assert!(matches!(load_from_path(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn invalid_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[model]\ntemperature = 9.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.temperature, 9.0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parley").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.variant, ModelVariant::Flash);
    assert_eq!(config.logging.level, crate::schema::LogLevel::Warning);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::ParleyConfig;

    let config: ParleyConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("parley"));
        assert!(path_str.ends_with("config.toml"));
    }
}
