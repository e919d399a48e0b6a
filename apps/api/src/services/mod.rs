//! Business logic for the Songbot API

pub mod chat;
pub mod tools;

pub use chat::{
    ChatError, ChatEvent, ChatReply, ChatResult, ChatRole, ChatService, Conversation,
    HistoryMessage, StreamErrorCode,
};
pub use tools::{tool_definitions, ToolInvocation, ToolKind};
