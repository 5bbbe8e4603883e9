//! Owner of the single live session handle.

use std::sync::Arc;

use parley_common::ModelVariant;
use tracing::debug;

use super::handle::SessionHandle;

/// Provider model names behind each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    pub flash: String,
    pub pro: String,
}

impl ModelCatalog {
    pub fn new(flash: impl Into<String>, pro: impl Into<String>) -> Self {
        Self {
            flash: flash.into(),
            pro: pro.into(),
        }
    }

    pub fn model_for(&self, variant: ModelVariant) -> &str {
        match variant {
            ModelVariant::Flash => &self.flash,
            ModelVariant::Pro => &self.pro,
        }
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new("gemini-2.5-flash", "gemini-2.5-pro")
    }
}

/// Holds exactly one live `SessionHandle`.
///
/// Replacing the handle drops the manager's reference to the old one. A
/// reply that is still streaming keeps its own `Arc` until it finishes.
pub struct SessionManager {
    models: ModelCatalog,
    system_instruction: Option<String>,
    current: Arc<SessionHandle>,
}

impl SessionManager {
    pub fn new(
        models: ModelCatalog,
        variant: ModelVariant,
        system_instruction: Option<String>,
    ) -> Self {
        let current = Arc::new(Self::build(&models, variant, system_instruction.clone()));
        Self {
            models,
            system_instruction,
            current,
        }
    }

    fn build(
        models: &ModelCatalog,
        variant: ModelVariant,
        system_instruction: Option<String>,
    ) -> SessionHandle {
        let handle = SessionHandle::new(variant, models.model_for(variant), system_instruction);
        debug!(session = %handle.id(), model = handle.model(), "session created");
        handle
    }

    /// Pure factory: allocate a handle without touching the network.
    pub fn create_session(
        &self,
        variant: ModelVariant,
        system_instruction: Option<&str>,
    ) -> SessionHandle {
        Self::build(
            &self.models,
            variant,
            system_instruction.map(str::to_string),
        )
    }

    /// The live handle.
    pub fn current(&self) -> Arc<SessionHandle> {
        Arc::clone(&self.current)
    }

    pub fn variant(&self) -> ModelVariant {
        self.current.variant()
    }

    /// Replace the live handle with a fresh one for `variant`.
    pub fn switch_variant(&mut self, variant: ModelVariant) -> Arc<SessionHandle> {
        let handle = self.create_session(variant, self.system_instruction.as_deref());
        self.current = Arc::new(handle);
        self.current()
    }

    /// Replace the live handle with a fresh one for the current variant.
    pub fn reset(&mut self) -> Arc<SessionHandle> {
        self.switch_variant(self.variant())
    }
}
