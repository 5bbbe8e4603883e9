//! Outgoing user request payloads.

use crate::image::ImagePayload;

/// What the user sends in one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// Plain text.
    Text { text: String },
    /// Text accompanied by one image.
    Multimodal { text: String, image: ImagePayload },
}

impl ChatRequest {
    /// Build the request for a submission. An image sent without text is
    /// paired with `default_prompt`.
    pub fn build(text: &str, image: Option<ImagePayload>, default_prompt: &str) -> Self {
        let trimmed = text.trim();
        match image {
            Some(image) => {
                let text = if trimmed.is_empty() {
                    default_prompt.to_string()
                } else {
                    trimmed.to_string()
                };
                ChatRequest::Multimodal { text, image }
            }
            None => ChatRequest::Text {
                text: trimmed.to_string(),
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChatRequest::Text { text } | ChatRequest::Multimodal { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            ChatRequest::Text { .. } => None,
            ChatRequest::Multimodal { image, .. } => Some(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImagePayload {
        ImagePayload {
            mime_type: "image/png".into(),
            data: "iVBORw0KGgo=".into(),
        }
    }

    #[test]
    fn text_only_builds_text_request() {
        let req = ChatRequest::build("  Hello  ", None, "What is in this image?");
        assert_eq!(
            req,
            ChatRequest::Text {
                text: "Hello".into()
            }
        );
        assert!(req.image().is_none());
    }

    #[test]
    fn image_without_text_uses_default_prompt() {
        let req = ChatRequest::build("   ", Some(png()), "What is in this image?");
        assert_eq!(req.text(), "What is in this image?");
        assert_eq!(req.image(), Some(&png()));
    }

    #[test]
    fn image_with_text_keeps_text() {
        let req = ChatRequest::build("Describe the colors", Some(png()), "default");
        assert!(matches!(req, ChatRequest::Multimodal { ref text, .. } if text == "Describe the colors"));
    }
}
