//! Conversation controller: the UI-facing state machine.
//!
//! Owns the visible message list, the pending image attachment, and the
//! session manager. A submission moves the controller from `Idle` to
//! `AwaitingResponse`; the reply's completion or failure moves it back.
//! Only one reply can be in flight.

mod message;
mod types;


pub use message::Message;
pub use types::{ControllerState, PendingReply, ReplyOutcome, SubmitError};

use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use parley_ai::{
    load_image, stream_reply, AiError, ChatProvider, ImagePayload, ModelVariant, Reconciler,
    SessionManager,
};
use parley_common::MessageId;
use parley_config::schema::ChatConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct ConversationController {
    provider: Arc<dyn ChatProvider>,
    sessions: SessionManager,
    chat: ChatConfig,
    messages: Vec<Message>,
    attachment: Option<ImagePayload>,
    state: ControllerState,
    /// Bumped by `clear`; replies from an older generation are ignored.
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl ConversationController {
    pub fn new(provider: Arc<dyn ChatProvider>, sessions: SessionManager, chat: ChatConfig) -> Self {
        let greeting = Message::model(chat.greeting.clone());
        Self {
            provider,
            sessions,
            chat,
            messages: vec![greeting],
            attachment: None,
            state: ControllerState::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ControllerState::AwaitingResponse
    }

    pub fn variant(&self) -> ModelVariant {
        self.sessions.variant()
    }

    pub fn model_name(&self) -> String {
        self.sessions.current().model().to_string()
    }

    pub fn attachment(&self) -> Option<&ImagePayload> {
        self.attachment.as_ref()
    }

    pub fn detach_image(&mut self) -> Option<ImagePayload> {
        self.attachment.take()
    }

    /// Attach an already-encoded image.
    pub fn set_attachment(&mut self, image: ImagePayload) {
        self.attachment = Some(image);
    }

    /// Load, validate, and attach an image file.
    ///
    /// On failure the attachment and the message list are left untouched.
    pub async fn select_image(&mut self, path: &Path) -> Result<(), SubmitError> {
        match load_image(path, self.chat.max_image_bytes).await {
            Ok(image) => {
                debug!(mime = %image.mime_type, "image attached");
                self.attachment = Some(image);
                Ok(())
            }
            Err(e) if e.is_validation() => {
                warn!(path = %path.display(), error = %e, "rejected non-image file");
                Err(SubmitError::InvalidImage(e))
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to encode image");
                Err(SubmitError::Encoding(e))
            }
        }
    }

    /// Attach an image given either as a file path or a `data:` URL.
    pub async fn select_image_source(&mut self, source: &str) -> Result<(), SubmitError> {
        if source.starts_with("data:") {
            let image = ImagePayload::from_data_url(source).map_err(|e| {
                warn!(error = %e, "rejected data URL");
                SubmitError::InvalidImage(e)
            })?;
            self.attachment = Some(image);
            return Ok(());
        }
        self.select_image(Path::new(source)).await
    }

    /// Accept a submission and open its reply stream.
    ///
    /// Appends the user message and an empty model placeholder, then enters
    /// `AwaitingResponse`. Rejected submissions change nothing.
    pub fn submit(&mut self, text: &str) -> Result<PendingReply, SubmitError> {
        if self.is_loading() {
            return Err(SubmitError::Busy);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() && self.attachment.is_none() {
            return Err(SubmitError::Empty);
        }
        if trimmed.len() > self.chat.max_input_len {
            return Err(SubmitError::TooLong {
                len: trimmed.len(),
                max: self.chat.max_input_len,
            });
        }

        let image = self.attachment.take();
        let session = self.sessions.current();
        let stream = stream_reply(
            Arc::clone(&self.provider),
            Arc::clone(&session),
            trimmed,
            image.clone(),
            &self.chat.default_image_prompt,
        );

        self.messages.push(Message::user(trimmed, image));
        let placeholder = Message::placeholder();
        let placeholder_id = placeholder.id.clone();
        self.messages.push(placeholder);

        self.state = ControllerState::AwaitingResponse;
        self.in_flight = Some(stream.cancel_handle());

        info!(
            session = %session.id(),
            model = session.model(),
            has_image = stream.request().image().is_some(),
            "message submitted"
        );

        Ok(PendingReply {
            placeholder: placeholder_id,
            generation: self.generation,
            session,
            stream,
        })
    }

    fn is_current(&self, pending: &PendingReply) -> bool {
        pending.generation == self.generation
    }

    fn placeholder_mut(&mut self, pending: &PendingReply) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == pending.placeholder)
    }

    /// Write the accumulated reply text into the placeholder.
    ///
    /// Returns `None` for a reply that no longer belongs to the visible
    /// conversation.
    pub fn apply_fragment(&mut self, pending: &PendingReply, accumulated: &str) -> Option<&Message> {
        if !self.is_current(pending) {
            return None;
        }
        let message = self.placeholder_mut(pending)?;
        message.text.clear();
        message.text.push_str(accumulated);
        Some(message)
    }

    fn settle(&mut self) {
        self.state = ControllerState::Idle;
        self.in_flight = None;
    }

    /// Finalize a reply that streamed to the end.
    pub fn finish_success(&mut self, pending: PendingReply, full_text: String) -> ReplyOutcome {
        if !self.is_current(&pending) {
            debug!("discarding reply from a cleared conversation");
            return ReplyOutcome::Stale;
        }
        pending
            .session
            .record_exchange(pending.stream.request(), &full_text);
        if let Some(message) = self.placeholder_mut(&pending) {
            message.text = full_text;
        }
        self.settle();
        ReplyOutcome::Completed
    }

    /// Finalize a reply that failed or was stopped.
    ///
    /// A failure replaces whatever arrived with the configured error text;
    /// a user stop keeps the partial text.
    pub fn finish_error(&mut self, pending: PendingReply, error: AiError) -> ReplyOutcome {
        if !self.is_current(&pending) {
            debug!(error = %error, "discarding failure from a cleared conversation");
            return ReplyOutcome::Stale;
        }
        let error_text = self.chat.error_text.clone();
        let outcome = match error {
            AiError::Cancelled => {
                info!("reply stopped");
                ReplyOutcome::Stopped
            }
            error => {
                warn!(error = %error, "reply failed");
                if let Some(message) = self.placeholder_mut(&pending) {
                    message.mark_error(error_text);
                }
                ReplyOutcome::Failed(error)
            }
        };
        self.settle();
        outcome
    }

    /// Drive a pending reply to completion, calling `on_update` with the
    /// placeholder after every fragment.
    pub async fn run_reply<F>(&mut self, mut pending: PendingReply, mut on_update: F) -> ReplyOutcome
    where
        F: FnMut(&Message),
    {
        let mut reconciler = Reconciler::new();
        while let Some(item) = pending.stream.next().await {
            match item {
                Ok(fragment) => {
                    let text = reconciler.push(&fragment);
                    if let Some(message) = self.apply_fragment(&pending, text) {
                        on_update(message);
                    }
                }
                Err(e) => return self.finish_error(pending, e),
            }
        }
        debug!(fragments = reconciler.fragment_count(), "reply complete");
        self.finish_success(pending, reconciler.into_text())
    }

    /// Reset to a fresh conversation.
    ///
    /// Cancels any in-flight reply, leaves exactly one greeting message,
    /// drops the attachment, and starts a new session.
    pub fn clear(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.messages = vec![Message::model(self.chat.greeting.clone())];
        self.attachment = None;
        let session = self.sessions.reset();
        self.state = ControllerState::Idle;
        info!(session = %session.id(), "conversation cleared");
    }

    /// Switch the model variant, keeping the visible history.
    pub fn switch_model(&mut self, variant: ModelVariant) -> Result<(), SubmitError> {
        if self.is_loading() {
            return Err(SubmitError::Busy);
        }
        if variant == self.variant() {
            return Ok(());
        }
        let session = self.sessions.switch_variant(variant);
        info!(variant = %variant, model = session.model(), "model switched");
        Ok(())
    }

    /// Switch to the other variant.
    pub fn toggle_model(&mut self) -> Result<ModelVariant, SubmitError> {
        let variant = self.variant().toggle();
        self.switch_model(variant)?;
        Ok(variant)
    }
}
