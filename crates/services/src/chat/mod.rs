pub mod ports;
mod prompts;

use inference_providers::{
    ChatCompletionParams, ChatMessage, CompletionProvider, MessageRole, StreamingResult,
};
use std::sync::Arc;
use tracing::debug;

pub use ports::{ChatError, ChatPrompt, ChatService};
pub use prompts::system_prompt_for;

pub struct ChatServiceImpl {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl ChatServiceImpl {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// The feature's system prompt first, then the conversation in its
    /// original order.
    fn prepare_messages(prompt: &ChatPrompt) -> Vec<ChatMessage> {
        let system = ChatMessage::new(
            MessageRole::System,
            system_prompt_for(&prompt.feature_id, &prompt.feature_title),
        );

        let mut messages = Vec::with_capacity(prompt.messages.len() + 1);
        messages.push(system);
        messages.extend(prompt.messages.iter().cloned());
        messages
    }
}

#[async_trait::async_trait]
impl ChatService for ChatServiceImpl {
    async fn stream_chat(&self, prompt: ChatPrompt) -> Result<StreamingResult, ChatError> {
        debug!(
            feature = %prompt.feature_id,
            messages = prompt.messages.len(),
            "forwarding conversation to completion backend"
        );

        let mut params = ChatCompletionParams::new(self.model.clone(), Self::prepare_messages(&prompt));
        params.stream = Some(true);

        Ok(self.provider.chat_completion_stream(params).await?)
    }
}
