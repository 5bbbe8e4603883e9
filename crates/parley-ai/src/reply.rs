//! Message stream reconciler.
//!
//! `stream_reply` turns one user submission into a lazy, finite,
//! non-restartable stream of non-empty text fragments. The stream ends
//! either normally or after yielding exactly one error; it never resumes
//! after an error. `Reconciler` folds the fragments into the growing text
//! of a single reply.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::image::ImagePayload;
use crate::request::ChatRequest;
use crate::session::SessionHandle;
use crate::{AiError, ChatProvider};

/// Streamed reply to one submission.
pub struct ReplyStream {
    inner: BoxStream<'static, Result<String, AiError>>,
    request: ChatRequest,
    cancel: CancellationToken,
    finished: bool,
}

impl ReplyStream {
    /// The request this reply answers.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// A token that stops the stream when cancelled.
    ///
    /// After cancellation the stream yields `AiError::Cancelled` once and ends.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive the stream to the end and return the full text.
    pub async fn collect_text(mut self) -> Result<String, AiError> {
        let mut reconciler = Reconciler::new();
        while let Some(fragment) = self.next().await {
            reconciler.push(&fragment?);
        }
        Ok(reconciler.into_text())
    }
}

impl Stream for ReplyStream {
    type Item = Result<String, AiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(fragment))) => Poll::Ready(Some(Ok(fragment))),
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                if this.cancel.is_cancelled() {
                    Poll::Ready(Some(Err(AiError::Cancelled)))
                } else {
                    Poll::Ready(None)
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Open a reply stream for `text` (and an optional image) in `session`.
///
/// Nothing is sent until the stream is first polled.
pub fn stream_reply(
    provider: Arc<dyn ChatProvider>,
    session: Arc<SessionHandle>,
    text: &str,
    image: Option<ImagePayload>,
    default_prompt: &str,
) -> ReplyStream {
    let request = ChatRequest::build(text, image, default_prompt);
    let cancel = CancellationToken::new();

    let opening = {
        let request = request.clone();
        async move {
            tracing::debug!(
                provider = provider.provider_name(),
                session = %session.id(),
                "opening reply stream"
            );
            provider.open_stream(&session, &request).await
        }
    };

    let stopped = {
        let cancel = cancel.clone();
        async move { cancel.cancelled().await }
    };

    let inner = stream::once(opening)
        .flat_map(|opened| match opened {
            Ok(fragments) => fragments,
            Err(e) => stream::once(async move { Err::<String, AiError>(e) }).boxed(),
        })
        .filter(|item| {
            let keep = !matches!(item, Ok(fragment) if fragment.is_empty());
            async move { keep }
        })
        .take_until(stopped)
        .boxed();

    ReplyStream {
        inner,
        request,
        cancel,
        finished: false,
    }
}

/// Accumulates fragments into the full reply text.
#[derive(Debug, Default)]
pub struct Reconciler {
    text: String,
    fragments: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return the full text so far.
    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.fragments += 1;
        &self.text
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
