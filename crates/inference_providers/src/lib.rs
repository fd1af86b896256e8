//! Streaming client for hosted chat-completion backends.
//!
//! Completions are streaming-first: the provider returns a stream of SSE
//! events as soon as the upstream model starts emitting tokens, so callers can
//! relay output incrementally instead of buffering a full response. Each event
//! carries both the parsed chunk and the raw bytes it was decoded from, which
//! lets a proxy forward the upstream stream verbatim.

pub mod hosted;
pub mod mock;
pub mod models;
pub mod sse_parser;

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

// Re-export commonly used types for convenience
pub use hosted::{HostedProvider, HostedProviderConfig};
pub use mock::MockProvider;
pub use models::{
    extract_error_message, ChatCompletionChunk, ChatCompletionParams, ChatDelta, ChatMessage,
    ChunkChoice, CompletionError, FinishReason, MessageRole, TokenUsage,
};
pub use sse_parser::{SseEvent, SseParser};

/// Type alias for streaming completion results
///
/// Each item is an SSE event containing:
/// - `raw_bytes` - the exact bytes received from the upstream (for forwarding)
/// - `chunk` - the parsed completion chunk
pub type StreamingResult = Pin<Box<dyn Stream<Item = Result<SseEvent, CompletionError>> + Send>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Performs a streaming chat completion request.
    ///
    /// Returns a stream of SSE events that can be processed incrementally.
    /// The stream emits events as they arrive from the underlying backend.
    async fn chat_completion_stream(
        &self,
        params: ChatCompletionParams,
    ) -> Result<StreamingResult, CompletionError>;
}
