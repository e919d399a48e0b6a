//! Chat service for the song recommender
//!
//! One turn sends the conversation to the model together with the catalog
//! tools. A text answer becomes the reply. A tool call runs the matching
//! Spotify query and the tracks become the reply; the model is not asked
//! to summarize them.

use serde::{Deserialize, Serialize};
use songbot_openai_client::{ChatMessage, Completion, OpenAiClient, OpenAiError};
use songbot_spotify_client::{SpotifyClient, SpotifyError, TrackRecord};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::tools::{tool_definitions, ToolInvocation, ToolKind};

/// Chat service errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalog request failed: {0}")]
    Catalog(#[from] SpotifyError),

    #[error("model request failed: {0}")]
    Model(#[from] OpenAiError),

    #[error("model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for tool {tool}: {message}")]
    ToolArguments { tool: String, message: String },
}

// ==================== ApiError Integration ====================

impl From<ChatError> for crate::error::ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidInput(msg) => crate::error::ApiError::ValidationError(msg),
            ChatError::Catalog(e) => crate::error::ApiError::Catalog(e.to_string()),
            ChatError::Model(e) => crate::error::ApiError::AiService(e.to_string()),
            e @ (ChatError::UnknownTool(_) | ChatError::ToolArguments { .. }) => {
                crate::error::ApiError::AiService(e.to_string())
            }
        }
    }
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

// ==================== Conversation ====================

/// Role of a history message
///
/// There is no system role: the only system prompt is the server's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl HistoryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            name: None,
        }
    }

    fn to_model_message(&self) -> ChatMessage {
        let message = match self.role {
            ChatRole::User => ChatMessage::user(&self.content),
            ChatRole::Assistant => ChatMessage::assistant(&self.content),
        };
        match &self.name {
            Some(name) => message.with_name(name),
            None => message,
        }
    }
}

/// Ordered chat history owned by the caller
///
/// Each turn appends to it; nothing is kept server-side between turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<HistoryMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: HistoryMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[HistoryMessage] {
        &self.messages
    }

    /// The last `n` messages, oldest first
    pub fn recent(&self, n: usize) -> &[HistoryMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<HistoryMessage> {
        self.messages
    }
}

impl From<Vec<HistoryMessage>> for Conversation {
    fn from(messages: Vec<HistoryMessage>) -> Self {
        Self { messages }
    }
}

// ==================== Replies and Events ====================

/// What a turn produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatReply {
    /// The model answered in prose
    Text { content: String },
    /// A tool ran and returned tracks
    Tracks {
        tool: ToolKind,
        heading: String,
        tracks: Vec<TrackRecord>,
    },
}

/// Events emitted while a streaming turn runs
///
/// At most one `Pending`, then exactly one of `Resolved` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A tool was chosen and its query is about to run
    Pending { tool: ToolKind, message: String },

    /// The turn finished
    Resolved {
        reply: ChatReply,
        history: Conversation,
    },

    /// The turn failed
    Failed {
        code: StreamErrorCode,
        message: String,
    },
}

/// Error codes for failed streaming turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamErrorCode {
    InvalidInput,
    CatalogError,
    AiServiceError,
    UnknownTool,
    ToolArguments,
}

impl ChatEvent {
    /// Create a failure event from a ChatError
    pub fn from_error(err: &ChatError) -> Self {
        let code = match err {
            ChatError::InvalidInput(_) => StreamErrorCode::InvalidInput,
            ChatError::Catalog(_) => StreamErrorCode::CatalogError,
            ChatError::Model(_) => StreamErrorCode::AiServiceError,
            ChatError::UnknownTool(_) => StreamErrorCode::UnknownTool,
            ChatError::ToolArguments { .. } => StreamErrorCode::ToolArguments,
        };
        ChatEvent::Failed {
            code,
            message: err.to_string(),
        }
    }

    /// SSE event name
    pub fn event_name(&self) -> &'static str {
        match self {
            ChatEvent::Pending { .. } => "pending",
            ChatEvent::Resolved { .. } => "resolved",
            ChatEvent::Failed { .. } => "error",
        }
    }
}

// ==================== Constants ====================

/// Maximum user message length in characters
const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Maximum history messages sent to the model
const MAX_CONTEXT_MESSAGES: usize = 20;

/// Channel capacity for streaming events
const STREAM_CHANNEL_CAPACITY: usize = 8;

const SYSTEM_PROMPT: &str = r#"You are a song recommender bot and you can help users get personalized song recommendations using the Spotify API.

Messages inside [ ] mean that it's a UI element or a user event. For example:
- "[Recommend songs based on my interests]" means that the user wants song recommendations based on their interests or genres, including specific conditions or environments like workout, study, or party.
- "[Recommend songs by artist]" means that the user wants song recommendations based on a specific artist.
- "[Recommend songs by language]" means that the user wants song recommendations based on a specific language.

If the user wants song recommendations, call 'get_song_recommendations' to provide recommendations.
If the user wants song recommendations by artist, call 'get_artist_songs' to provide recommendations.
If the user wants song recommendations by language, call 'get_language_recommendations' to provide recommendations.
If the user wants anything else unrelated to the function calls, respond that you are a demo and cannot do that."#;

// ==================== Chat Service ====================

/// Service running chat turns against the model and the catalog
#[derive(Debug, Clone)]
pub struct ChatService {
    openai: OpenAiClient,
    spotify: SpotifyClient,
}

impl ChatService {
    pub fn new(openai: OpenAiClient, spotify: SpotifyClient) -> Self {
        Self { openai, spotify }
    }

    /// Trim a user message and check its length
    pub fn validate_message(message: &str) -> ChatResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidInput(
                "Message cannot be empty".to_string(),
            ));
        }

        let length = message.chars().count();
        if length > MAX_MESSAGE_LENGTH {
            return Err(ChatError::InvalidInput(format!(
                "Message too long: {} characters (max {})",
                length, MAX_MESSAGE_LENGTH
            )));
        }

        Ok(message.to_string())
    }

    /// Check every caller-supplied history entry against the message limit
    pub fn validate_history(conversation: &Conversation) -> ChatResult<()> {
        for (index, entry) in conversation.messages().iter().enumerate() {
            let length = entry.content.chars().count();
            if length > MAX_MESSAGE_LENGTH {
                return Err(ChatError::InvalidInput(format!(
                    "History message {} too long: {} characters (max {})",
                    index, length, MAX_MESSAGE_LENGTH
                )));
            }
        }
        Ok(())
    }

    /// Run one turn and return its reply
    ///
    /// The user message and the assistant's answer (or the tool's history
    /// note) are appended to `conversation`. On error the user message stays
    /// appended and nothing else is added.
    #[instrument(skip(self, conversation, message), fields(history_len = conversation.len()))]
    pub async fn send_message(
        &self,
        conversation: &mut Conversation,
        message: &str,
    ) -> ChatResult<ChatReply> {
        let message = Self::validate_message(message)?;
        Self::validate_history(conversation)?;
        self.run_turn(conversation, message, None).await
    }

    /// Run one turn in a background task, reporting through a channel
    ///
    /// Validation happens before the task starts, so an invalid message is
    /// returned as an error here and no events are produced.
    ///
    /// # Events
    /// - `ChatEvent::Pending` - When a tool is chosen, before its query runs
    /// - `ChatEvent::Resolved` - Final reply with the updated conversation
    /// - `ChatEvent::Failed` - If the turn fails
    #[instrument(skip(self, conversation, message), fields(history_len = conversation.len()))]
    pub fn send_message_streaming(
        &self,
        mut conversation: Conversation,
        message: &str,
    ) -> ChatResult<mpsc::Receiver<ChatEvent>> {
        let message = Self::validate_message(message)?;
        Self::validate_history(&conversation)?;
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let service = self.clone();

        tokio::spawn(async move {
            let event = match service.run_turn(&mut conversation, message, Some(&tx)).await {
                Ok(reply) => ChatEvent::Resolved {
                    reply,
                    history: conversation,
                },
                Err(e) => {
                    warn!(error = %e, "Streaming chat turn failed");
                    ChatEvent::from_error(&e)
                }
            };
            if tx.send(event).await.is_err() {
                debug!("Stream receiver dropped before the turn finished");
            }
        });

        Ok(rx)
    }

    async fn run_turn(
        &self,
        conversation: &mut Conversation,
        message: String,
        events: Option<&mpsc::Sender<ChatEvent>>,
    ) -> ChatResult<ChatReply> {
        conversation.push(HistoryMessage::user(message));

        let messages = self.build_messages(conversation);
        let completion = self
            .openai
            .chat_completion(&messages, &tool_definitions())
            .await?;

        match completion {
            Completion::Text(content) => {
                debug!(reply_len = content.len(), "Model answered with text");
                conversation.push(HistoryMessage::assistant(content.clone()));
                Ok(ChatReply::Text { content })
            }
            Completion::ToolCalls(calls) => {
                if calls.len() > 1 {
                    debug!(count = calls.len(), "Model requested several tools, using the first");
                }
                let call = calls
                    .first()
                    .ok_or_else(|| ChatError::UnknownTool(String::new()))?;
                let invocation = ToolInvocation::from_call(call)?;
                self.execute_tool(conversation, invocation, events).await
            }
        }
    }

    /// System prompt plus the most recent history
    fn build_messages(&self, conversation: &Conversation) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(SYSTEM_PROMPT))
            .chain(
                conversation
                    .recent(MAX_CONTEXT_MESSAGES)
                    .iter()
                    .map(HistoryMessage::to_model_message),
            )
            .collect()
    }

    async fn execute_tool(
        &self,
        conversation: &mut Conversation,
        invocation: ToolInvocation,
        events: Option<&mpsc::Sender<ChatEvent>>,
    ) -> ChatResult<ChatReply> {
        let kind = invocation.kind;

        info!(
            tool = kind.name(),
            argument = %invocation.argument,
            "Executing tool"
        );

        if let Some(tx) = events {
            let pending = ChatEvent::Pending {
                tool: kind,
                message: kind.pending_message().to_string(),
            };
            if tx.send(pending).await.is_err() {
                debug!("Stream receiver dropped, continuing turn");
            }
        }

        let tracks = self.spotify.search_tracks(&invocation.query()).await?;

        debug!(tool = kind.name(), track_count = tracks.len(), "Tool finished");

        conversation.push(HistoryMessage {
            role: ChatRole::Assistant,
            content: kind.history_note(&invocation.argument),
            name: Some(kind.name().to_string()),
        });

        Ok(ChatReply::Tracks {
            tool: kind,
            heading: kind.heading(&invocation.argument),
            tracks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use songbot_shared_config::{OpenAiConfig, SpotifyConfig};
    use songbot_test_utils::{track_json, MockOpenAiServer, MockSpotifyServer};

    fn service(openai: &MockOpenAiServer, spotify: &MockSpotifyServer) -> ChatService {
        let openai_client =
            OpenAiClient::new(&OpenAiConfig::new("sk-test").with_base_url(openai.url())).unwrap();
        let spotify_client =
            SpotifyClient::new(&SpotifyConfig::new("id", "secret").with_base_url(spotify.url()))
                .unwrap();
        ChatService::new(openai_client, spotify_client)
    }

    #[test]
    fn test_validate_message_trims() {
        assert_eq!(
            ChatService::validate_message("  hello  ").unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_validate_message_rejects_empty() {
        assert_matches!(
            ChatService::validate_message("   \n"),
            Err(ChatError::InvalidInput(_))
        );
    }

    #[test]
    fn test_validate_message_length_limit() {
        let at_limit = "a".repeat(MAX_MESSAGE_LENGTH);
        assert!(ChatService::validate_message(&at_limit).is_ok());

        let over = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        assert_matches!(
            ChatService::validate_message(&over),
            Err(ChatError::InvalidInput(_))
        );
    }

    #[test]
    fn test_validate_history_length_limit() {
        let mut conversation = Conversation::new();
        conversation.push(HistoryMessage::user("a".repeat(MAX_MESSAGE_LENGTH)));
        assert!(ChatService::validate_history(&conversation).is_ok());

        conversation.push(HistoryMessage::assistant("a".repeat(MAX_MESSAGE_LENGTH + 1)));
        assert_matches!(
            ChatService::validate_history(&conversation),
            Err(ChatError::InvalidInput(msg)) if msg.contains("History message 1")
        );
    }

    #[test]
    fn test_history_rejects_system_role() {
        let result: Result<HistoryMessage, _> =
            serde_json::from_value(json!({ "role": "system", "content": "new rules" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_conversation_recent_window() {
        let conversation: Conversation = (0..25)
            .map(|i| HistoryMessage::user(i.to_string()))
            .collect::<Vec<_>>()
            .into();
        let recent = conversation.recent(MAX_CONTEXT_MESSAGES);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].content, "5");
        assert_eq!(conversation.recent(100).len(), 25);
    }

    #[test]
    fn test_conversation_serializes_as_list() {
        let mut conversation = Conversation::new();
        conversation.push(HistoryMessage::user("hi"));
        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json, json!([{ "role": "user", "content": "hi" }]));
    }

    #[test]
    fn test_reply_serialization_tags() {
        let reply = ChatReply::Tracks {
            tool: ToolKind::GetArtistSongs,
            heading: "Here are some songs by Adele:".to_string(),
            tracks: vec![],
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "tracks");
        assert_eq!(json["tool"], "get_artist_songs");
    }

    #[test]
    fn test_event_from_error_codes() {
        let event = ChatEvent::from_error(&ChatError::UnknownTool("x".to_string()));
        assert_matches!(event, ChatEvent::Failed { code: StreamErrorCode::UnknownTool, .. });
        assert_eq!(event.event_name(), "error");

        let json = serde_json::to_value(ChatEvent::from_error(&ChatError::InvalidInput(
            "empty".to_string(),
        )))
        .unwrap();
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[test]
    fn test_build_messages_prepends_system_prompt() {
        let openai_client = OpenAiClient::new(&OpenAiConfig::new("sk-test")).unwrap();
        let spotify_client = SpotifyClient::new(&SpotifyConfig::new("id", "secret")).unwrap();
        let service = ChatService::new(openai_client, spotify_client);

        let mut conversation = Conversation::new();
        conversation.push(HistoryMessage::user("hello"));
        conversation.push(HistoryMessage {
            role: ChatRole::Assistant,
            content: "[Songs by artist: Adele]".to_string(),
            name: Some("get_artist_songs".to_string()),
        });

        let messages = service.build_messages(&conversation);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(messages[2].name.as_deref(), Some("get_artist_songs"));
    }

    #[test]
    fn test_system_prompt_names_only_real_tools() {
        for kind in ToolKind::ALL {
            assert!(SYSTEM_PROMPT.contains(kind.name()));
        }
        assert!(!SYSTEM_PROMPT.contains("get_song_suggestion"));
    }

    #[tokio::test]
    async fn test_text_reply_appends_history() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_text_reply("I'm a demo and cannot do that.")
            .await;

        let mut conversation = Conversation::new();
        let reply = service(&openai, &spotify)
            .send_message(&mut conversation, "  what's the weather?  ")
            .await
            .unwrap();

        assert_eq!(
            reply,
            ChatReply::Text {
                content: "I'm a demo and cannot do that.".to_string()
            }
        );
        assert_eq!(
            conversation.messages(),
            &[
                HistoryMessage::user("what's the weather?"),
                HistoryMessage::assistant("I'm a demo and cannot do that."),
            ]
        );
        assert_eq!(spotify.token_calls().await, 0);
    }

    #[tokio::test]
    async fn test_tool_reply_runs_query_and_records_note() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_tool_call("get_song_recommendations", json!({ "interests": "workout, study" }))
            .await;
        spotify.mock_token_success().await;
        spotify
            .mock_search_tracks(vec![track_json("Stronger", "Kanye West", &["https://img/1"])])
            .await;

        let mut conversation = Conversation::new();
        let reply = service(&openai, &spotify)
            .send_message(&mut conversation, "[Recommend songs based on my interests]")
            .await
            .unwrap();

        assert_matches!(
            &reply,
            ChatReply::Tracks { tool: ToolKind::GetSongRecommendations, heading, tracks }
                if heading == "Here are some song recommendations for you:" && tracks.len() == 1
        );

        let last = &conversation.messages()[1];
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(
            last.content,
            "[Recommended Songs based on interests: workout, study]"
        );
        assert_eq!(last.name.as_deref(), Some("get_song_recommendations"));

        assert_eq!(openai.completion_calls().await, 1);
        assert_eq!(spotify.token_calls().await, 1);
        assert_eq!(spotify.search_calls().await, 1);
    }

    #[tokio::test]
    async fn test_request_carries_tools_and_recent_history() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai.mock_text_reply("ok").await;

        let mut conversation: Conversation = (0..30)
            .map(|i| HistoryMessage::user(format!("old {}", i)))
            .collect::<Vec<_>>()
            .into();
        service(&openai, &spotify)
            .send_message(&mut conversation, "latest")
            .await
            .unwrap();

        let bodies = openai.request_bodies().await;
        let body = &bodies[0];
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1 + MAX_CONTEXT_MESSAGES);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[MAX_CONTEXT_MESSAGES]["content"], "latest");
        assert_eq!(body["tools"].as_array().unwrap().len(), 3);
        assert_eq!(body["tool_choice"], "auto");
    }

    #[tokio::test]
    async fn test_invalid_message_makes_no_calls() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;

        let mut conversation = Conversation::new();
        let result = service(&openai, &spotify)
            .send_message(&mut conversation, "   ")
            .await;

        assert_matches!(result, Err(ChatError::InvalidInput(_)));
        assert!(conversation.is_empty());
        assert_eq!(openai.completion_calls().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_turn() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_tool_call("get_song_suggestion", json!({ "song": "x" }))
            .await;

        let mut conversation = Conversation::new();
        let result = service(&openai, &spotify)
            .send_message(&mut conversation, "suggest a song")
            .await;

        assert_matches!(result, Err(ChatError::UnknownTool(name)) if name == "get_song_suggestion");
        assert_eq!(spotify.token_calls().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_tool_arguments_fail_turn() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_tool_call_raw("get_artist_songs", "{not json")
            .await;

        let mut conversation = Conversation::new();
        let result = service(&openai, &spotify)
            .send_message(&mut conversation, "songs by someone")
            .await;

        assert_matches!(result, Err(ChatError::ToolArguments { .. }));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_tool_call("get_artist_songs", json!({ "artist": "Adele" }))
            .await;
        spotify.mock_token_failure(401).await;

        let mut conversation = Conversation::new();
        let result = service(&openai, &spotify)
            .send_message(&mut conversation, "songs by Adele")
            .await;

        assert_matches!(result, Err(ChatError::Catalog(e)) if e.is_auth_failure());
        assert_eq!(spotify.search_calls().await, 0);
        assert_eq!(conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_streaming_tool_turn_emits_pending_then_resolved() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai
            .mock_tool_call("get_artist_songs", json!({ "artist": "Daft Punk" }))
            .await;
        spotify.mock_token_success().await;
        spotify
            .mock_search_tracks(vec![track_json("One More Time", "Daft Punk", &[])])
            .await;

        let mut rx = service(&openai, &spotify)
            .send_message_streaming(Conversation::new(), "songs by Daft Punk")
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            ChatEvent::Pending {
                tool: ToolKind::GetArtistSongs,
                message: "Fetching songs by the specified artist...".to_string(),
            }
        );
        assert_matches!(
            &events[1],
            ChatEvent::Resolved { reply: ChatReply::Tracks { heading, .. }, history }
                if heading == "Here are some songs by Daft Punk:" && history.len() == 2
        );
    }

    #[tokio::test]
    async fn test_streaming_text_turn_has_no_pending() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai.mock_text_reply("Hello!").await;

        let mut rx = service(&openai, &spotify)
            .send_message_streaming(Conversation::new(), "hi")
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 1);
        assert_matches!(&events[0], ChatEvent::Resolved { reply: ChatReply::Text { .. }, .. });
    }

    #[tokio::test]
    async fn test_streaming_failure_emits_failed() {
        let openai = MockOpenAiServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        openai.mock_failure(500, "boom").await;

        let mut rx = service(&openai, &spotify)
            .send_message_streaming(Conversation::new(), "hi")
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_matches!(event, ChatEvent::Failed { code: StreamErrorCode::AiServiceError, .. });
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_streaming_rejects_invalid_message_up_front() {
        let openai_client = OpenAiClient::new(&OpenAiConfig::new("sk-test")).unwrap();
        let spotify_client = SpotifyClient::new(&SpotifyConfig::new("id", "secret")).unwrap();
        let service = ChatService::new(openai_client, spotify_client);

        let result = service.send_message_streaming(Conversation::new(), "");
        assert_matches!(result, Err(ChatError::InvalidInput(_)));
    }
}
