// src/api/http/chat.rs

use axum::{Json, body::Bytes, extract::State};
use serde_json::{Value, json};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{ChatRequest, ChatResponse, RawChatRequest};

use super::AppState;

/// POST /chat
///
/// The body is parsed as JSON whatever its `Content-Type`, so simple
/// cross-origin posts sent as `text/plain` are accepted too.
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ChatResponse>> {
    let raw: RawChatRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;
    let request = ChatRequest::try_from(raw)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id);

    let reply = async move {
        info!(
            "Chat request: message_len={} history={}",
            request.message.len(),
            request.conversation_history.len()
        );
        state.assembler.answer(&request).await
    }
    .instrument(span)
    .await?;

    Ok(Json(ChatResponse::reply(reply)))
}

/// GET /chat
pub async fn chat_status_handler() -> Json<Value> {
    Json(json!({
        "message": "Chat API is running. Use POST to send messages."
    }))
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
