use async_trait::async_trait;
use inference_providers::{ChatMessage, CompletionError, StreamingResult};

/// A conversation plus the showcase feature it belongs to.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub messages: Vec<ChatMessage>,
    pub feature_id: String,
    pub feature_title: String,
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("upstream completion failed: {0}")]
    Upstream(#[from] CompletionError),
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Stream a completion for the conversation, with the feature's system
    /// prompt prepended as the first message.
    async fn stream_chat(&self, prompt: ChatPrompt) -> Result<StreamingResult, ChatError>;
}
