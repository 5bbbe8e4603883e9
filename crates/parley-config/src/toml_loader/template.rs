//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
variant = "flash"                 # flash, pro
# flash_model = "gemini-2.5-flash"
# pro_model = "gemini-2.5-pro"
# max_output_tokens = 8192        # 1-65536
# temperature = 0.7               # 0.0-2.0
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# api_key_env = "GEMINI_API_KEY"  # env var holding the API key
# request_timeout_secs = 120

[chat]
# system_instruction = "You are a helpful, friendly assistant."
# greeting = "Hello! How can I help you today?"
# error_text = "Sorry, I encountered an error while generating a response. Please try again."
# default_image_prompt = "What is in this image?"
# max_image_bytes = 5242880
# max_input_len = 16384

[logging]
level = "WARNING"                 # DEBUG, INFO, WARNING, ERROR (written to stderr)
"##
    .to_string()
}
