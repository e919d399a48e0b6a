//! Mock OpenAI server for testing chat completions

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock OpenAI chat completions server
///
/// Point `OpenAiConfig::with_base_url` at [`MockOpenAiServer::url`].
pub struct MockOpenAiServer {
    server: MockServer,
}

impl MockOpenAiServer {
    /// Start a new mock OpenAI server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    async fn mount_completion(&self, message: Value, finish_reason: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "model": "gpt-3.5-turbo",
                "choices": [{
                    "index": 0,
                    "message": message,
                    "finish_reason": finish_reason
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a completion answering with plain text
    pub async fn mock_text_reply(&self, content: &str) {
        self.mount_completion(
            json!({ "role": "assistant", "content": content }),
            "stop",
        )
        .await;
    }

    /// Mount a completion that calls `name` with the given JSON arguments
    pub async fn mock_tool_call(&self, name: &str, arguments: Value) {
        self.mock_tool_call_raw(name, &arguments.to_string()).await;
    }

    /// Mount a completion that calls `name` with a raw argument string
    pub async fn mock_tool_call_raw(&self, name: &str, arguments: &str) {
        self.mount_completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_mock_1",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                }]
            }),
            "tool_calls",
        )
        .await;
    }

    /// Mount a completion failure
    pub async fn mock_failure(&self, status_code: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": { "message": message, "type": "server_error" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every completion request received, in order
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Number of completion requests received
    pub async fn completion_calls(&self) -> usize {
        self.request_bodies().await.len()
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }
}
