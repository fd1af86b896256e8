//! Hosted OpenAI-compatible backend.
//!
//! Talks to any provider exposing the OpenAI `/chat/completions` wire format
//! with bearer authentication.

use crate::{
    extract_error_message, ChatCompletionParams, CompletionError, CompletionProvider, SseParser,
    StreamingResult,
};
use async_trait::async_trait;
use reqwest::{header::HeaderValue, Client};

#[derive(Debug, Clone)]
pub struct HostedProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

pub struct HostedProvider {
    client: Client,
    config: HostedProviderConfig,
}

impl HostedProvider {
    pub fn new(config: HostedProviderConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| CompletionError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn build_headers(&self) -> Result<reqwest::header::HeaderMap, CompletionError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", self.config.api_key);
        let header_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| CompletionError::Network(format!("invalid API key format: {e}")))?;
        headers.insert("Authorization", header_value);

        Ok(headers)
    }
}

#[async_trait]
impl CompletionProvider for HostedProvider {
    async fn chat_completion_stream(
        &self,
        params: ChatCompletionParams,
    ) -> Result<StreamingResult, CompletionError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        // Ensure streaming is enabled regardless of what the caller set
        let mut streaming_params = params;
        streaming_params.stream = Some(true);

        let headers = self.build_headers()?;
        let timeout = std::time::Duration::from_secs(self.config.timeout_seconds);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(timeout)
            .json(&streaming_params)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read error response body: {e}"));
            tracing::error!(
                status = status_code,
                body = %error_text,
                "completion backend rejected request"
            );
            return Err(CompletionError::HttpError {
                status_code,
                message: extract_error_message(&error_text),
            });
        }

        let sse_stream = SseParser::new(response.bytes_stream());
        Ok(Box::pin(sse_stream))
    }
}
