// E2E tests for the streaming chat proxy

mod common;

use axum::http::{header::CONTENT_TYPE, StatusCode};
use common::*;
use inference_providers::{MessageRole, MockProvider};
use std::sync::Arc;

fn chat_body(feature_id: &str, feature_title: &str) -> serde_json::Value {
    serde_json::json!({
        "messages": [
            {"role": "user", "content": "What does BRCA1 c.68_69delAG mean?"}
        ],
        "featureId": feature_id,
        "featureTitle": feature_title,
    })
}

#[tokio::test]
async fn test_chat_relays_upstream_stream() {
    let provider = Arc::new(MockProvider::with_chunks(vec!["Hel", "ix"]));
    let server = server_with_chat(provider.clone());

    let response = server
        .post("/api/chat")
        .json(&chat_body("variant-explorer", "Variant Explorer"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let body = response.text();
    assert!(body.contains("Hel"));
    assert!(body.contains("ix"));
    assert!(body.ends_with("data: [DONE]\n\n"));

    // The feature's system prompt was prepended before forwarding
    let sent = provider.received();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].messages[0].role, MessageRole::System);
    assert_eq!(sent[0].messages[1].role, MessageRole::User);
}

#[tokio::test]
async fn test_unknown_feature_prompt_names_title_verbatim() {
    let provider = Arc::new(MockProvider::with_chunks(vec!["ok"]));
    let server = server_with_chat(provider.clone());

    let response = server
        .post("/api/chat")
        .json(&chat_body("proteome-atlas", "Proteome Atlas (beta)"))
        .await;

    response.assert_status_ok();
    let sent = provider.received();
    assert!(sent[0].messages[0].content.contains("Proteome Atlas (beta)"));
}

#[tokio::test]
async fn test_upstream_failure_returns_json_error() {
    let provider = Arc::new(MockProvider::failing("backend down"));
    let server = server_with_chat(provider);

    let response = server
        .post("/api/chat")
        .json(&chat_body("variant-explorer", "Variant Explorer"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    // Generic error only; upstream detail stays in the logs
    assert_eq!(body["error"], "upstream model request failed");
}

#[tokio::test]
async fn test_empty_messages_rejected() {
    let provider = Arc::new(MockProvider::with_chunks(vec!["ok"]));
    let server = server_with_chat(provider.clone());

    let response = server
        .post("/api/chat")
        .json(&serde_json::json!({
            "messages": [],
            "featureId": "variant-explorer",
            "featureTitle": "Variant Explorer",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(provider.received().is_empty());
}
