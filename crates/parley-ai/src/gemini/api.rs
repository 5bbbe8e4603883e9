//! ChatProvider implementation for GeminiClient.

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::request::ChatRequest;
use crate::session::SessionHandle;
use crate::streaming::sse_events;
use crate::{AiError, ChatProvider, FragmentStream};

use super::client::{error_message, parse_stream_chunk, GeminiClient};

/// Body read failures keep their timeout-ness through the `io::Error`.
fn body_error(e: reqwest::Error) -> std::io::Error {
    if e.is_timeout() {
        std::io::Error::new(std::io::ErrorKind::TimedOut, e)
    } else {
        std::io::Error::other(e)
    }
}

fn network_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn open_stream(
        &self,
        session: &SessionHandle,
        request: &ChatRequest,
    ) -> Result<FragmentStream, AiError> {
        let body = self.build_request_body(session, request);
        let url = self.stream_url(session.model());

        debug!(
            model = session.model(),
            session = %session.id(),
            multimodal = request.image().is_some(),
            "Gemini API streaming request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!(
                "HTTP {status}: {}",
                error_message(&text)
            )));
        }

        let byte_stream = response
            .bytes_stream()
            .map_err(body_error)
            .boxed();
        let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));

        let fragments = sse_events(reader)
            .map(|event| event.and_then(|event| parse_stream_chunk(&event.data)))
            .boxed();
        Ok(fragments)
    }
}
