//! Construction of the chat provider from config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parley_ai::{AiError, ChatProvider, ChatRequest, GeminiClient, GeminiConfig, SessionHandle};
use parley_config::schema::ModelConfig;

/// Stand-in used when no API key is available.
///
/// The client still starts; every send fails with the configuration error
/// so it surfaces as an error message in the conversation.
pub struct UnconfiguredProvider {
    reason: AiError,
}

impl UnconfiguredProvider {
    pub fn new(reason: AiError) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl ChatProvider for UnconfiguredProvider {
    fn provider_name(&self) -> &str {
        "unconfigured"
    }

    async fn open_stream(
        &self,
        _session: &SessionHandle,
        _request: &ChatRequest,
    ) -> Result<parley_ai::FragmentStream, AiError> {
        Err(self.reason.clone())
    }
}

pub fn gemini_config(model: &ModelConfig) -> Result<GeminiConfig, AiError> {
    Ok(GeminiConfig::from_env(&model.api_key_env)?
        .with_api_base(model.api_base.as_str())
        .with_max_output_tokens(model.max_output_tokens)
        .with_temperature(model.temperature)
        .with_timeout(Duration::from_secs(model.request_timeout_secs)))
}

/// Build the Gemini provider, falling back to `UnconfiguredProvider`.
pub fn build_provider(model: &ModelConfig) -> Arc<dyn ChatProvider> {
    match gemini_config(model).and_then(GeminiClient::new) {
        Ok(client) => {
            tracing::info!(api_base = %client.config().api_base, "Gemini provider ready");
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!("Gemini API not configured: {e}");
            Arc::new(UnconfiguredProvider::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_ai::{ModelCatalog, ModelVariant, SessionManager};

    #[test]
    fn missing_key_is_not_configured() {
        let model = ModelConfig {
            api_key_env: "PARLEY_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            gemini_config(&model),
            Err(AiError::NotConfigured(_))
        ));
        assert_eq!(build_provider(&model).provider_name(), "unconfigured");
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_every_send() {
        let provider = UnconfiguredProvider::new(AiError::NotConfigured("no key".into()));
        let session =
            SessionManager::new(ModelCatalog::default(), ModelVariant::Flash, None).current();
        let request = ChatRequest::Text { text: "hi".into() };

        let result = provider.open_stream(&session, &request).await;
        assert!(matches!(result, Err(AiError::NotConfigured(_))));
    }
}
