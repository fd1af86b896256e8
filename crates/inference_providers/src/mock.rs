//! Mock implementation of [`CompletionProvider`] for testing.
//!
//! Plays back a scripted sequence of content chunks, or fails before the
//! stream starts, and records every request it receives so tests can assert
//! on the exact messages that were forwarded upstream.

use crate::{
    ChatCompletionChunk, ChatCompletionParams, ChatDelta, ChunkChoice, CompletionError,
    CompletionProvider, SseEvent, StreamingResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockProvider {
    chunks: Vec<String>,
    failure: Option<String>,
    received: Mutex<Vec<ChatCompletionParams>>,
}

impl MockProvider {
    /// A provider that streams the given content chunks in order.
    pub fn with_chunks(chunks: Vec<impl Into<String>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// A provider that fails before emitting any stream.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Requests this provider has handled, in arrival order.
    pub fn received(&self) -> Vec<ChatCompletionParams> {
        self.received.lock().unwrap().clone()
    }

    fn event_for(content: &str, index: usize) -> SseEvent {
        let chunk = ChatCompletionChunk {
            id: format!("chatcmpl-mock-{index}"),
            object: "chat.completion.chunk".to_string(),
            created: 0,
            model: "mock".to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: Some(ChatDelta {
                    role: None,
                    content: Some(content.to_string()),
                }),
                finish_reason: None,
            }],
            usage: None,
        };
        let json = serde_json::to_string(&chunk).expect("serialize mock chunk");
        SseEvent {
            raw_bytes: Bytes::from(format!("data: {json}\n\n")),
            chunk,
        }
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn chat_completion_stream(
        &self,
        params: ChatCompletionParams,
    ) -> Result<StreamingResult, CompletionError> {
        self.received.lock().unwrap().push(params);

        if let Some(message) = &self.failure {
            return Err(CompletionError::Network(message.clone()));
        }

        let events: Vec<Result<SseEvent, CompletionError>> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, content)| Ok(Self::event_for(content, i)))
            .collect();

        Ok(Box::pin(stream::iter(events)))
    }
}
