//! HTTP route handlers for the Songbot API
//!
//! - Chat turn endpoints (JSON and Server-Sent Events)
//! - Health check endpoints

pub mod chat;
pub mod health;

pub use chat::{chat_router, ChatState};
pub use health::health_router;

use axum::{routing::get, Router};

/// Welcome message served at `/`
pub const WELCOME_MESSAGE: &str = "Welcome to Songbot - personalized song recommendations";

/// Assemble the application routes without middleware layers
pub fn app_router(chat_state: ChatState) -> Router {
    Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live
        .nest("/health", health_router())
        // Chat routes: /chat, /chat/stream
        .nest("/chat", chat_router(chat_state))
}

async fn root() -> &'static str {
    WELCOME_MESSAGE
}
