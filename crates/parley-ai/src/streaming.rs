//! Server-Sent Events (SSE) streaming parser.
//!
//! Gemini's `streamGenerateContent?alt=sse` endpoint emits one JSON
//! document per event. This module turns any buffered async reader into a
//! lazy stream of events, so a reply is only read as fast as it is consumed.

use futures_util::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, if the server sent one.
    pub event: Option<String>,
    /// The event data (JSON string).
    pub data: String,
}

struct SseParser<R> {
    lines: Lines<R>,
    current_event: Option<String>,
    current_data: String,
    finished: bool,
}

impl<R: AsyncBufRead + Unpin> SseParser<R> {
    async fn next_event(&mut self) -> Option<Result<SseEvent, AiError>> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // Flush any remaining event
                    self.finished = true;
                    return self.take_event().map(Ok);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(match e.kind() {
                        std::io::ErrorKind::TimedOut => AiError::Timeout,
                        _ => AiError::NetworkError(e.to_string()),
                    }));
                }
            };

            if line.is_empty() {
                // Empty line = end of event
                match self.take_event() {
                    Some(event) => return Some(Ok(event)),
                    None => continue,
                }
            }

            if let Some(event_type) = field_value(&line, "event") {
                self.current_event = Some(event_type.to_string());
            } else if let Some(data) = field_value(&line, "data") {
                if !self.current_data.is_empty() {
                    self.current_data.push('\n');
                }
                self.current_data.push_str(data);
            }
            // Ignore other fields (id:, retry:, comments)
        }
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        let event = self.current_event.take();
        if self.current_data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.current_data),
        })
    }
}

/// `name: value` or `name:value`.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Parse SSE events from a buffered reader.
///
/// The stream ends after the last event, or after yielding a single error
/// if the underlying reader fails (`Timeout` for a timed-out read,
/// `NetworkError` otherwise).
pub fn sse_events<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>>
where
    R: AsyncBufRead + Unpin,
{
    let parser = SseParser {
        lines: reader.lines(),
        current_event: None,
        current_data: String::new(),
        finished: false,
    };

    futures_util::stream::unfold(parser, |mut parser| async move {
        let item = parser.next_event().await?;
        Some((item, parser))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn collect(input: &'static str) -> Vec<Result<SseEvent, AiError>> {
        sse_events(input.as_bytes()).collect().await
    }

    #[tokio::test]
    async fn parses_data_events() {
        let events = collect("data: {\"a\":1}\n\ndata: {\"b\":2}\n\n").await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().data, "{\"a\":1}");
        assert_eq!(events[1].as_ref().unwrap().data, "{\"b\":2}");
    }

    #[tokio::test]
    async fn joins_multiline_data() {
        let events = collect("data: line one\ndata: line two\n\n").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().data, "line one\nline two");
    }

    #[tokio::test]
    async fn keeps_event_type_and_ignores_other_fields() {
        let events = collect(": keepalive\nid: 7\nevent: delta\ndata: x\n\n").await;
        let event = events[0].as_ref().unwrap();
        assert_eq!(event.event.as_deref(), Some("delta"));
        assert_eq!(event.data, "x");
    }

    #[tokio::test]
    async fn flushes_trailing_event_without_blank_line() {
        let events = collect("data: first\n\ndata: last").await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].as_ref().unwrap().data, "last");
    }

    #[tokio::test]
    async fn handles_crlf_and_no_space_after_colon() {
        let events = collect("data:{\"x\":true}\r\n\r\n").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().data, "{\"x\":true}");
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        assert!(collect("").await.is_empty());
        assert!(collect("\n\n\n").await.is_empty());
    }
    async fn collect_failing(kind: std::io::ErrorKind) -> Vec<Result<SseEvent, AiError>> {
        let chunks: Vec<std::io::Result<&'static [u8]>> = vec![
            Ok(b"data: partial\n\n"),
            Err(std::io::Error::new(kind, "body read failed")),
            Ok(b"data: never\n\n"),
        ];
        let reader = tokio_util::io::StreamReader::new(futures_util::stream::iter(chunks));
        sse_events(reader).collect().await
    }

    #[tokio::test]
    async fn timed_out_read_yields_timeout_once() {
        let events = collect_failing(std::io::ErrorKind::TimedOut).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().data, "partial");
        assert_eq!(events[1], Err(AiError::Timeout));
    }

    #[tokio::test]
    async fn other_read_failure_is_network_error() {
        let events = collect_failing(std::io::ErrorKind::ConnectionReset).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Err(AiError::NetworkError(_))));
    }
}
