use crate::{ChatCompletionChunk, CompletionError};
use bytes::Bytes;
use futures_util::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A single SSE event with both raw bytes and parsed content.
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// The raw bytes of this event as received (including the `data: ` prefix
    /// and trailing newline), suitable for verbatim forwarding.
    pub raw_bytes: Bytes,
    /// The parsed completion chunk.
    pub chunk: ChatCompletionChunk,
}

/// SSE stream parser that buffers incomplete events across HTTP chunks.
///
/// One HTTP chunk may carry several SSE events, or an event may be split over
/// chunk boundaries; complete events are queued and drained one per poll.
pub struct SseParser<S> {
    inner: S,
    buffer: Vec<u8>,
    pending: VecDeque<Result<SseEvent, CompletionError>>,
    done: bool,
}

impl<S> SseParser<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn parse_data(data: &str) -> Result<Option<ChatCompletionChunk>, CompletionError> {
        // End-of-stream marker
        if data == "[DONE]" {
            return Ok(None);
        }

        serde_json::from_str::<ChatCompletionChunk>(data)
            .map(Some)
            .map_err(|e| CompletionError::InvalidResponse(format!("bad SSE chunk: {e}")))
    }

    fn drain_buffer(&mut self) {
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_len = newline_pos + 1; // include the newline
            let raw_bytes = Bytes::copy_from_slice(&self.buffer[..line_len]);
            self.buffer.drain(..line_len);

            let line = String::from_utf8_lossy(&raw_bytes);
            let line = line.trim();

            // Skip blank lines and SSE comments
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                match Self::parse_data(data) {
                    Ok(Some(chunk)) => self.pending.push_back(Ok(SseEvent { raw_bytes, chunk })),
                    Ok(None) => {} // [DONE]
                    Err(e) => self.pending.push_back(Err(e)),
                }
            }
        }
    }
}

impl<S> Stream for SseParser<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    type Item = Result<SseEvent, CompletionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Poll::Ready(Some(event));
            }
            if self.done {
                return Poll::Ready(None);
            }

            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.buffer.extend_from_slice(&bytes);
                    self.drain_buffer();
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(CompletionError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    if !self.buffer.is_empty() {
                        tracing::warn!("incomplete SSE data in buffer at stream end");
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
