//! AI engine for Parley.
//!
//! Provides:
//! - A provider abstraction (`ChatProvider`) over hosted chat models
//! - A Gemini client with SSE streaming
//! - Session management (one live provider-side conversation at a time)
//! - The reply stream reconciler that folds fragments into one message
//! - Image intake (validation and base64 encoding)

pub mod gemini;
pub mod image;
pub mod reply;
pub mod request;
pub mod session;
pub mod streaming;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use image::{load_image, ImageError, ImagePayload};
pub use parley_common::ModelVariant;
pub use reply::{stream_reply, Reconciler, ReplyStream};
pub use request::ChatRequest;
pub use session::{ModelCatalog, SessionHandle, SessionManager};

/// Raw text fragments as produced by a provider, in generation order.
///
/// Items may be empty; `ReplyStream` filters those out.
pub type FragmentStream = BoxStream<'static, Result<String, AiError>>;

/// The upstream model provider.
///
/// Creating a session is local (see `SessionManager`); the provider is only
/// contacted when a message is sent.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short name used in logs.
    fn provider_name(&self) -> &str;

    /// Send `request` in the context of `session` and return the streamed reply.
    async fn open_stream(
        &self,
        session: &SessionHandle,
        request: &ChatRequest,
    ) -> Result<FragmentStream, AiError>;
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One completed turn of provider-side context.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Cancelled")]
    Cancelled,
    #[error("Not configured: {0}")]
    NotConfigured(String),
}
