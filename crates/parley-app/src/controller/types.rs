//! Controller state, submission errors, and in-flight reply bookkeeping.

use std::sync::Arc;

use parley_ai::{AiError, ImageError, ReplyStream, SessionHandle};
use parley_common::MessageId;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse,
}

/// Why a user action was not carried out. None of these change state.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("nothing to send")]
    Empty,
    #[error("a reply is still in progress")]
    Busy,
    #[error("message too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },
    #[error("{0}")]
    InvalidImage(ImageError),
    #[error("could not attach image: {0}")]
    Encoding(ImageError),
}

/// How a reply ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The placeholder holds the full reply.
    Completed,
    /// The placeholder was replaced by the error text.
    Failed(AiError),
    /// Stopped by the user; the placeholder keeps what arrived.
    Stopped,
    /// The conversation was cleared while the reply was running; nothing
    /// was written.
    Stale,
}

/// A reply accepted by `submit` that has not finished yet.
pub struct PendingReply {
    pub(super) placeholder: MessageId,
    pub(super) generation: u64,
    pub(super) session: Arc<SessionHandle>,
    pub(super) stream: ReplyStream,
}

impl PendingReply {
    pub fn placeholder_id(&self) -> &MessageId {
        &self.placeholder
    }

    /// Cancelling stops the stream ("stop generating").
    pub fn cancel_handle(&self) -> CancellationToken {
        self.stream.cancel_handle()
    }
}
