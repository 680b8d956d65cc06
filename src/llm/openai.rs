//! OpenAI API client implementation
//!
//! Implements the CompletionClient trait for OpenAI's Chat Completions API
//! and normalizes the provider response into the crate's ChatCompletion
//! shape at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::client::CompletionClient;
use super::error::LlmError;
use super::types::{ChatCompletion, ChatMessage, Choice, ChoiceMessage, Role, TokenUsage, ToolCall};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client from configuration
    ///
    /// Fails with `MissingCredential` when the configured API key
    /// environment variable is absent.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key()?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            http,
            timeout,
        })
    }

    fn build_request_body(&self, model_id: &str, messages: &[ChatMessage], temperature: f32) -> serde_json::Value {
        serde_json::json!({
            "model": model_id,
            "messages": messages,
            "temperature": temperature,
        })
    }

    /// Copy every provider field into the internal shape
    ///
    /// Optional fields (tool calls, fingerprint) are included only when the
    /// provider supplied them, never synthesized.
    fn normalize(&self, api_response: OpenAiResponse) -> ChatCompletion {
        let choices = api_response
            .choices
            .into_iter()
            .map(|c| Choice {
                index: c.index,
                message: ChoiceMessage {
                    role: match c.message.role.as_str() {
                        "system" => Role::System,
                        "user" => Role::User,
                        _ => Role::Assistant,
                    },
                    content: c.message.content,
                    tool_calls: c.message.tool_calls.map(|tcs| {
                        tcs.into_iter()
                            .map(|tc| ToolCall {
                                id: tc.id,
                                name: tc.function.name,
                                arguments: tc.function.arguments,
                            })
                            .collect()
                    }),
                },
                finish_reason: c.finish_reason,
            })
            .collect();

        ChatCompletion {
            id: api_response.id,
            model: api_response.model,
            choices,
            usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            system_fingerprint: api_response.system_fingerprint,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        model_id: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<ChatCompletion, LlmError> {
        debug!(%model_id, message_count = messages.len(), "sending completion request");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(model_id, &messages, temperature);

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Network(e)
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let api_response: OpenAiResponse = response.json().await?;
        debug!(id = %api_response.id, "completion received");
        Ok(self.normalize(api_response))
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: OpenAiUsage,
    system_fingerprint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    index: u32,
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> OpenAiClient {
        OpenAiClient {
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            timeout: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_build_request_body() {
        let client = test_client();
        let messages = vec![ChatMessage::system("be helpful"), ChatMessage::user("hello")];

        let body = client.build_request_body("gpt-4o", &messages, 0.0);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be helpful");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn test_normalize_copies_all_fields() {
        let client = test_client();
        let json = r#"{
            "id": "chatcmpl-123",
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "1. search(query=\"cats\") -> R1"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 15, "total_tokens": 135},
            "system_fingerprint": "fp_abc"
        }"#;

        let api_response: OpenAiResponse = serde_json::from_str(json).unwrap();
        let completion = client.normalize(api_response);

        assert_eq!(completion.id, "chatcmpl-123");
        assert_eq!(completion.model, "gpt-4o-2024-08-06");
        assert_eq!(completion.choices.len(), 1);
        assert_eq!(completion.choices[0].index, 0);
        assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.top_content(), Some("1. search(query=\"cats\") -> R1"));
        assert_eq!(completion.usage.prompt_tokens, 120);
        assert_eq!(completion.usage.total_tokens, 135);
        assert_eq!(completion.system_fingerprint.as_deref(), Some("fp_abc"));
    }

    #[test]
    fn test_normalize_omits_absent_optional_fields() {
        let client = test_client();
        let json = r#"{
            "id": "chatcmpl-456",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null, "tool_calls": [
                    {"id": "call_1", "type": "function",
                     "function": {"name": "search", "arguments": "{\"query\":\"cats\"}"}}
                ]},
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let api_response: OpenAiResponse = serde_json::from_str(json).unwrap();
        let completion = client.normalize(api_response);

        assert!(completion.system_fingerprint.is_none());
        assert!(completion.choices[0].message.content.is_none());
        let tool_calls = completion.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tool_calls[0].name, "search");
    }
}
