//! Chat completions HTTP client

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use songbot_shared_config::OpenAiConfig;
use tracing::{debug, instrument, warn};

use crate::error::{OpenAiError, OpenAiResult};
use crate::models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Completion, ErrorResponse,
    ToolDefinition,
};

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// OpenAI chat completions client
///
/// Single request per call, no retry.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    config: OpenAiConfig,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    /// Returns `OpenAiError::MissingApiKey` if the API key is empty
    pub fn new(config: &OpenAiConfig) -> OpenAiResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent("Songbot/1.0")
            .build()?;

        Self::with_client(config, http_client)
    }

    /// Create a client with custom HTTP client (for testing)
    pub fn with_client(config: &OpenAiConfig, http_client: Client) -> OpenAiResult<Self> {
        if config.api_key.is_empty() {
            return Err(OpenAiError::MissingApiKey);
        }

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Truncate error body to prevent memory exhaustion
    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }

        // Last char boundary at or below the limit
        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);

        format!("{}... (truncated)", &body[..truncate_at])
    }

    /// Request a completion, offering `tools` with automatic tool choice
    ///
    /// Returns the first choice as either text or the tool calls it requested.
    ///
    /// # Errors
    /// - `OpenAiError::Api` - On a non-2xx status
    /// - `OpenAiError::Timeout` / `OpenAiError::Http` - On transport failure
    /// - `OpenAiError::Json` - If the body is not a completion
    /// - `OpenAiError::InvalidResponse` - If there is no choice, or a choice
    ///   with neither content nor tool calls
    #[instrument(skip(self, messages, tools), fields(model = %self.config.model, message_count = messages.len()))]
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> OpenAiResult<Completion> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            tools: (!tools.is_empty()).then(|| tools.to_vec()),
            tool_choice: (!tools.is_empty()).then(|| "auto".to_string()),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http_client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OpenAiError::Timeout(self.config.timeout_secs)
                } else {
                    OpenAiError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| Self::truncate_error_body(body));
            warn!(status = %status, message = %message, "Chat completion failed");
            return Err(OpenAiError::Api { status, message });
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiError::InvalidResponse("no choices in response".to_string()))?;

        debug!(finish_reason = ?choice.finish_reason, "Chat completion received");

        match (choice.message.tool_calls, choice.message.content) {
            (Some(calls), _) if !calls.is_empty() => Ok(Completion::ToolCalls(calls)),
            (_, Some(content)) => Ok(Completion::Text(content)),
            _ => Err(OpenAiError::InvalidResponse(
                "choice has neither content nor tool calls".to_string(),
            )),
        }
    }
}
