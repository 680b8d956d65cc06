//! CompletionClient trait definition

use async_trait::async_trait;

use super::error::LlmError;
use super::types::{ChatCompletion, ChatMessage};

/// Stateless completion backend boundary
///
/// Each call is independent; no conversation state is kept between calls.
/// The provider wire protocol is entirely encapsulated behind this trait.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request and return the normalized result
    async fn complete(
        &self,
        model_id: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<ChatCompletion, LlmError>;
}

impl std::fmt::Debug for dyn CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CompletionClient")
    }
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Mock completion client for unit tests
    pub struct MockCompletionClient {
        responses: Vec<Result<ChatCompletion, LlmError>>,
        call_count: AtomicUsize,
    }

    impl MockCompletionClient {
        pub fn new(responses: Vec<Result<ChatCompletion, LlmError>>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for MockCompletionClient {
        async fn complete(
            &self,
            _model_id: &str,
            _messages: Vec<ChatMessage>,
            _temperature: f32,
        ) -> Result<ChatCompletion, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(completion)) => Ok(completion.clone()),
                Some(Err(err)) => Err(clone_error(err)),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }

    // LlmError is not Clone (reqwest::Error inside); rebuild the variants tests use
    fn clone_error(err: &LlmError) -> LlmError {
        match err {
            LlmError::MissingCredential { env_var } => LlmError::MissingCredential {
                env_var: env_var.clone(),
            },
            LlmError::ContextOverflow {
                prompt_tokens,
                max_tokens,
                model,
            } => LlmError::ContextOverflow {
                prompt_tokens: *prompt_tokens,
                max_tokens: *max_tokens,
                model: model.clone(),
            },
            LlmError::RateLimited { retry_after } => LlmError::RateLimited {
                retry_after: *retry_after,
            },
            LlmError::ApiError { status, message } => LlmError::ApiError {
                status: *status,
                message: message.clone(),
            },
            LlmError::Timeout(d) => LlmError::Timeout(*d),
            LlmError::Template(msg) => LlmError::Template(msg.clone()),
            other => LlmError::InvalidResponse(other.to_string()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::types::{Choice, ChoiceMessage, Role, TokenUsage};

        fn completion(content: &str) -> ChatCompletion {
            ChatCompletion {
                id: "cmpl-mock".to_string(),
                model: "gpt-4o".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: ChoiceMessage {
                        role: Role::Assistant,
                        content: Some(content.to_string()),
                        tool_calls: None,
                    },
                    finish_reason: Some("stop".to_string()),
                }],
                usage: TokenUsage::default(),
                system_fingerprint: None,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockCompletionClient::new(vec![Ok(completion("one")), Ok(completion("two"))]);

            let resp = client.complete("gpt-4o", vec![], 0.0).await.unwrap();
            assert_eq!(resp.top_content(), Some("one"));

            let resp = client.complete("gpt-4o", vec![], 0.0).await.unwrap();
            assert_eq!(resp.top_content(), Some("two"));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockCompletionClient::new(vec![]);
            assert!(client.complete("gpt-4o", vec![], 0.0).await.is_err());
        }
    }
}
