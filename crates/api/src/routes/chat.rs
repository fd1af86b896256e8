//! Streaming chat proxy route.

use crate::{
    models::{ChatProxyRequest, ErrorResponse},
    AppState,
};
use axum::{
    body::Body,
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json as ResponseJson, Response},
};
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use services::chat::ChatPrompt;
use std::convert::Infallible;
use tracing::{debug, error};

/// Proxy a conversation to the hosted completion model, relaying the SSE
/// stream verbatim as it arrives.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatProxyRequest>) -> Response {
    debug!(
        feature = %request.feature_id,
        messages = request.messages.len(),
        "chat proxy request"
    );

    if let Err(error) = request.validate() {
        return (StatusCode::BAD_REQUEST, ResponseJson(ErrorResponse::new(error))).into_response();
    }

    let prompt = ChatPrompt {
        messages: request
            .messages
            .into_iter()
            .map(|m| m.into_chat_message())
            .collect(),
        feature_id: request.feature_id,
        feature_title: request.feature_title,
    };

    match state.chat.stream_chat(prompt).await {
        Ok(upstream) => {
            // Forward raw upstream bytes; a mid-stream error ends the relay.
            let relay = upstream
                .scan((), |_, event| {
                    future::ready(match event {
                        Ok(ev) => Some(Ok::<_, Infallible>(ev.raw_bytes)),
                        Err(e) => {
                            error!(error = %e, "completion stream error, ending relay");
                            None
                        }
                    })
                })
                .chain(stream::once(async {
                    Ok(Bytes::from_static(b"data: [DONE]\n\n"))
                }));

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/event-stream"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                Body::from_stream(relay),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "chat upstream request failed");
            (
                StatusCode::BAD_GATEWAY,
                ResponseJson(ErrorResponse::new("upstream model request failed")),
            )
                .into_response()
        }
    }
}
