//! Gemini API client struct, request building, and chunk parsing.

use crate::request::ChatRequest;
use crate::session::SessionHandle;
use crate::{AiError, Role, Turn};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            // Idle limit per read; long replies keep streaming past it
            .read_timeout(config.timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/{}:streamGenerateContent?alt=sse",
            self.config.api_base, model
        )
    }

    /// Build the JSON request body: prior turns, then the new user turn.
    pub(crate) fn build_request_body(
        &self,
        session: &SessionHandle,
        request: &ChatRequest,
    ) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> =
            session.history().iter().map(turn_to_content).collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": request_parts(request),
        }));

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_output_tokens,
                "temperature": self.config.temperature,
            }
        });

        if let Some(system) = session.system_instruction() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }]
            });
        }

        body
    }
}

fn image_part(mime_type: &str, data: &str) -> serde_json::Value {
    serde_json::json!({
        "inlineData": { "mimeType": mime_type, "data": data }
    })
}

fn request_parts(request: &ChatRequest) -> Vec<serde_json::Value> {
    match request {
        ChatRequest::Text { text } => vec![serde_json::json!({ "text": text })],
        ChatRequest::Multimodal { text, image } => vec![
            image_part(&image.mime_type, &image.data),
            serde_json::json!({ "text": text }),
        ],
    }
}

fn turn_to_content(turn: &Turn) -> serde_json::Value {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "model",
    };
    let mut parts = Vec::new();
    if let Some(ref image) = turn.image {
        parts.push(image_part(&image.mime_type, &image.data));
    }
    parts.push(serde_json::json!({ "text": turn.text }));
    serde_json::json!({ "role": role, "parts": parts })
}

/// Extract the text carried by one streamed chunk.
///
/// Returns an empty string for chunks without text (e.g. the final chunk
/// that only carries `finishReason` and usage metadata).
pub(crate) fn parse_stream_chunk(data: &str) -> Result<String, AiError> {
    let json: serde_json::Value =
        serde_json::from_str(data).map_err(|e| AiError::ParseError(e.to_string()))?;

    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(AiError::ApiError(message.to_string()));
    }

    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
    }

    let mut chunk = String::new();
    if let Some(candidates) = json["candidates"].as_array() {
        for candidate in candidates {
            if let Some(parts) = candidate["content"]["parts"].as_array() {
                for part in parts {
                    // Thought summaries are not part of the visible reply
                    if part["thought"].as_bool() == Some(true) {
                        continue;
                    }
                    if let Some(t) = part["text"].as_str() {
                        chunk.push_str(t);
                    }
                }
            }
        }
    }
    Ok(chunk)
}

/// Pull a human-readable message out of an error response body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
