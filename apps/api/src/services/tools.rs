//! Catalog tools offered to the model
//!
//! Each tool wraps one Spotify query helper. The model picks a tool by name
//! and supplies its single string argument as JSON.

use serde::{Deserialize, Serialize};
use songbot_openai_client::{ToolCall, ToolDefinition};
use songbot_spotify_client::SearchQuery;

use super::chat::{ChatError, ChatResult};

/// The three catalog tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    GetSongRecommendations,
    GetArtistSongs,
    GetLanguageRecommendations,
}

impl ToolKind {
    /// Every tool, in the order offered to the model
    pub const ALL: [ToolKind; 3] = [
        ToolKind::GetSongRecommendations,
        ToolKind::GetArtistSongs,
        ToolKind::GetLanguageRecommendations,
    ];

    /// Function name exposed to the model
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::GetSongRecommendations => "get_song_recommendations",
            ToolKind::GetArtistSongs => "get_artist_songs",
            ToolKind::GetLanguageRecommendations => "get_language_recommendations",
        }
    }

    /// Look a tool up by its function name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Name of the single required parameter
    pub fn parameter(&self) -> &'static str {
        match self {
            ToolKind::GetSongRecommendations => "interests",
            ToolKind::GetArtistSongs => "artist",
            ToolKind::GetLanguageRecommendations => "language",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ToolKind::GetSongRecommendations => {
                "Get song recommendations based on user interests using the Spotify API."
            }
            ToolKind::GetArtistSongs => {
                "Get song recommendations based on a specific artist using the Spotify API."
            }
            ToolKind::GetLanguageRecommendations => {
                "Get song recommendations based on a specific language using the Spotify API."
            }
        }
    }

    fn parameter_description(&self) -> &'static str {
        match self {
            ToolKind::GetSongRecommendations => {
                "A comma-separated list of user interests, genres, or specific conditions (e.g., workout, study, party)."
            }
            ToolKind::GetArtistSongs => "The name of the artist.",
            ToolKind::GetLanguageRecommendations => "The language of the songs.",
        }
    }

    /// Function definition with a JSON schema for the parameter
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            self.description(),
            serde_json::json!({
                "type": "object",
                "properties": {
                    self.parameter(): {
                        "type": "string",
                        "description": self.parameter_description()
                    }
                },
                "required": [self.parameter()]
            }),
        )
    }

    /// Progress message shown while the query runs
    pub fn pending_message(&self) -> &'static str {
        match self {
            ToolKind::GetSongRecommendations => {
                "Fetching song recommendations based on your interests..."
            }
            ToolKind::GetArtistSongs => "Fetching songs by the specified artist...",
            ToolKind::GetLanguageRecommendations => {
                "Fetching song recommendations based on the specified language..."
            }
        }
    }

    /// Heading placed above the resolved track list
    pub fn heading(&self, argument: &str) -> String {
        match self {
            ToolKind::GetArtistSongs => format!("Here are some songs by {}:", argument),
            ToolKind::GetSongRecommendations | ToolKind::GetLanguageRecommendations => {
                "Here are some song recommendations for you:".to_string()
            }
        }
    }

    /// Assistant note recorded in the conversation after the tool ran
    pub fn history_note(&self, argument: &str) -> String {
        match self {
            ToolKind::GetSongRecommendations => {
                format!("[Recommended Songs based on interests: {}]", argument)
            }
            ToolKind::GetArtistSongs => format!("[Songs by artist: {}]", argument),
            ToolKind::GetLanguageRecommendations => {
                format!("[Recommended Songs in language: {}]", argument)
            }
        }
    }
}

/// Definitions for every tool
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.iter().map(ToolKind::definition).collect()
}

/// A resolved tool call: which tool, with which argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub kind: ToolKind,
    pub argument: String,
}

impl ToolInvocation {
    /// Resolve a model tool call against the tool table
    ///
    /// # Errors
    /// - `ChatError::UnknownTool` - If no tool has that name
    /// - `ChatError::ToolArguments` - If the arguments are not a JSON object
    ///   with the tool's parameter as a string
    pub fn from_call(call: &ToolCall) -> ChatResult<Self> {
        let kind = ToolKind::from_name(&call.function.name)
            .ok_or_else(|| ChatError::UnknownTool(call.function.name.clone()))?;

        let arguments: serde_json::Value =
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                ChatError::ToolArguments {
                    tool: kind.name().to_string(),
                    message: e.to_string(),
                }
            })?;

        let argument = arguments
            .get(kind.parameter())
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ChatError::ToolArguments {
                tool: kind.name().to_string(),
                message: format!("missing string parameter '{}'", kind.parameter()),
            })?;

        Ok(Self {
            kind,
            argument: argument.to_string(),
        })
    }

    /// Catalog query this invocation runs
    pub fn query(&self) -> SearchQuery {
        match self.kind {
            ToolKind::GetSongRecommendations => SearchQuery::Interests(self.argument.clone()),
            ToolKind::GetArtistSongs => SearchQuery::Artist(self.argument.clone()),
            ToolKind::GetLanguageRecommendations => SearchQuery::Language(self.argument.clone()),
        }
    }
}
