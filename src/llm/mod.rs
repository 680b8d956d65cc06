//! LLM client module
//!
//! Message composition, token budgeting, the completion client boundary,
//! and the gateway that normalizes provider failures.

use std::sync::Arc;

pub mod client;
mod error;
mod gateway;
pub mod models;
mod openai;
pub mod tokens;
pub mod types;

pub use client::CompletionClient;
pub use error::LlmError;
pub use gateway::ChatGateway;
pub use models::{ModelKind, ModelProfile};
pub use openai::OpenAiClient;
pub use tokens::{ASSISTANT_PRIMING_TOKENS, HeuristicTokenizer, TokenBreakdown, Tokenizer, count_tokens, estimate_tokens};
pub use types::{
    ChatCompletion, ChatMessage, Choice, ChoiceMessage, Role, TokenUsage, ToolCall, compose_examples, compose_messages,
    compose_system, compose_user,
};

use crate::config::LlmConfig;

/// Create a completion client for the provider named in config
///
/// Currently only the "openai" provider is supported.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, LlmError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: openai",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).unwrap_err();
        assert_eq!(err.kind(), "invalid-response");
    }
}
