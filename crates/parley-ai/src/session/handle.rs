//! The live provider-side conversation context.

use std::sync::{Mutex, PoisonError};

use parley_common::{ModelVariant, SessionId};

use crate::request::ChatRequest;
use crate::{Role, Turn};

/// Opaque reference to one provider-side conversation.
///
/// Model and system instruction are fixed at creation; only the turn
/// history grows, and only after a reply completes successfully.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    variant: ModelVariant,
    model: String,
    system_instruction: Option<String>,
    history: Mutex<Vec<Turn>>,
}

impl SessionHandle {
    pub(crate) fn new(
        variant: ModelVariant,
        model: impl Into<String>,
        system_instruction: Option<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            variant,
            model: model.into(),
            system_instruction,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Provider model name, e.g. `gemini-2.5-flash`.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Snapshot of the completed turns.
    pub fn history(&self) -> Vec<Turn> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn turn_count(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Append a completed user/model exchange.
    pub fn record_exchange(&self, request: &ChatRequest, reply: &str) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push(Turn {
            role: Role::User,
            text: request.text().to_string(),
            image: request.image().cloned(),
        });
        history.push(Turn {
            role: Role::Model,
            text: reply.to_string(),
            image: None,
        });
    }
}
