//! Chat messages as shown in the conversation view.

use chrono::{DateTime, Local};
use parley_ai::{ImagePayload, Role};
use parley_common::MessageId;

/// A single message in the visible history.
///
/// Model placeholders are mutated in place while their reply streams in;
/// messages are never removed individually.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub image: Option<ImagePayload>,
    pub timestamp: DateTime<Local>,
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, text: impl Into<String>, image: Option<ImagePayload>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.into(),
            image,
            timestamp: Local::now(),
            is_error: false,
        }
    }

    pub fn user(text: impl Into<String>, image: Option<ImagePayload>) -> Self {
        Self::new(Role::User, text, image)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text, None)
    }

    /// Empty model message that a streaming reply fills in.
    pub fn placeholder() -> Self {
        Self::model(String::new())
    }

    /// Replace the text with a failure notice.
    pub fn mark_error(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.is_error = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_empty_model_message() {
        let m = Message::placeholder();
        assert_eq!(m.role, Role::Model);
        assert!(m.text.is_empty());
        assert!(!m.is_error);
    }

    #[test]
    fn mark_error_replaces_text() {
        let mut m = Message::model("partial answer");
        m.mark_error("Sorry");
        assert_eq!(m.text, "Sorry");
        assert!(m.is_error);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::user("a", None).id, Message::user("a", None).id);
    }
}
