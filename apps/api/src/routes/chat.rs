//! Chat REST route handlers
//!
//! - `POST /chat` - Run one turn and return the reply with updated history
//! - `POST /chat/stream` - Same turn as Server-Sent Events (`pending`,
//!   then `resolved` or `error`)

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::post,
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::error::ApiResult;
use crate::services::{ChatEvent, ChatReply, ChatService, Conversation, HistoryMessage};

/// Shared application state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    /// Chat service
    pub chat_service: Arc<ChatService>,
}

impl ChatState {
    /// Create new chat state
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}

/// Create chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/stream", post(send_message_stream))
        .with_state(state)
}

// ========== Request/Response Types ==========

/// Chat turn request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, as returned by the previous turn
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
    /// New user message
    pub message: String,
}

/// Chat turn response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: ChatReply,
    pub history: Conversation,
}

// ========== Route Handlers ==========

/// Run one chat turn
///
/// # Request
/// - Method: POST
/// - Path: /chat
/// - Body: JSON with `history` and `message`
///
/// # Response
/// - 200 OK: `{ reply, history }`
/// - 400 Bad Request: Empty or oversized message, malformed body
/// - 502 Bad Gateway: Spotify or OpenAI failed
async fn send_message(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    let mut conversation = Conversation::from(request.history);

    let reply = state
        .chat_service
        .send_message(&mut conversation, &request.message)
        .await?;

    Ok(Json(ChatResponse {
        reply,
        history: conversation,
    }))
}

/// Run one chat turn as a Server-Sent Events stream
///
/// Validation errors are returned as a plain JSON error before the stream
/// opens. After that every outcome arrives as an event.
async fn send_message_stream(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let Json(request) = payload?;

    let receiver = state
        .chat_service
        .send_message_streaming(Conversation::from(request.history), &request.message)?;

    let stream = ReceiverStream::new(receiver).map(|event| Ok(to_sse_event(&event)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &ChatEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .json_data(event)
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to encode chat event");
            Event::default()
                .event("error")
                .data(r#"{"type":"failed","code":"INTERNAL_ERROR","message":"failed to encode event"}"#)
        })
}
