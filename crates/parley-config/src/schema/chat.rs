//! Conversation texts and input limits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Sent as the system instruction of every new session. Empty disables it.
    pub system_instruction: String,
    /// First message of a fresh conversation (startup and after clear).
    pub greeting: String,
    /// Replaces a reply that failed mid-stream.
    pub error_text: String,
    /// Prompt used when an image is sent without text.
    pub default_image_prompt: String,
    pub max_image_bytes: u64,
    pub max_input_len: usize,
}

impl ChatConfig {
    pub fn system_instruction(&self) -> Option<&str> {
        let s = self.system_instruction.trim();
        (!s.is_empty()).then_some(s)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: "You are a helpful, friendly assistant. \
                Answer clearly and concisely. When the user shares an image, \
                describe and reason about it carefully."
                .into(),
            greeting: "Hello! How can I help you today?".into(),
            error_text: "Sorry, I encountered an error while generating a response. \
                Please try again."
                .into(),
            default_image_prompt: "What is in this image?".into(),
            max_image_bytes: 5 * 1024 * 1024,
            max_input_len: 16 * 1024,
        }
    }
}
