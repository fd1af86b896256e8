use inference_providers::{ChatMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// Inbound chat proxy request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProxyRequest {
    pub messages: Vec<ChatMessageBody>,
    pub feature_id: String,
    pub feature_title: String,
}

impl ChatProxyRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageBody {
    pub role: String,
    pub content: String,
}

impl ChatMessageBody {
    pub fn into_chat_message(self) -> ChatMessage {
        let role = match self.role.as_str() {
            "system" => MessageRole::System,
            "assistant" => MessageRole::Assistant,
            _ => MessageRole::User,
        };
        ChatMessage::new(role, self.content)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
