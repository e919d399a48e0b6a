//! OpenAI chat completions client for Songbot
//!
//! A small non-streaming client for `/chat/completions` with function-style
//! tool calling. The caller supplies the message list and tool definitions;
//! the client returns either the model's text or the tool calls it chose.
//!
//! # Example
//!
//! ```no_run
//! use songbot_openai_client::{ChatMessage, Completion, OpenAiClient};
//! use songbot_shared_config::OpenAiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(&OpenAiConfig::from_env()?)?;
//!
//! let messages = vec![
//!     ChatMessage::system("You are a helpful assistant."),
//!     ChatMessage::user("Hello!"),
//! ];
//! if let Completion::Text(reply) = client.chat_completion(&messages, &[]).await? {
//!     println!("{}", reply);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::OpenAiClient;
pub use error::{OpenAiError, OpenAiResult};
pub use models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, Choice, Completion,
    FunctionCall, FunctionDefinition, ToolCall, ToolDefinition,
};
