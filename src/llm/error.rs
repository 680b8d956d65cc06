//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the completion backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API credential not found. Set the {env_var} environment variable.")]
    MissingCredential { env_var: String },

    #[error("Prompt of {prompt_tokens} tokens exceeds context window of {max_tokens} for {model}")]
    ContextOverflow {
        prompt_tokens: usize,
        max_tokens: usize,
        model: String,
    },

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Stable kind tag for log diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::MissingCredential { .. } => "missing-credential",
            LlmError::ContextOverflow { .. } => "context-overflow",
            LlmError::RateLimited { .. } => "rate-limited",
            LlmError::ApiError { .. } => "api-error",
            LlmError::Network(_) => "network",
            LlmError::Timeout(_) => "timeout",
            LlmError::InvalidResponse(_) => "invalid-response",
            LlmError::Template(_) => "template",
            LlmError::Json(_) => "json",
        }
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Transient backend faults: recoverable, the caller may retry with backoff
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => *status >= 500 || *status == 408,
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::MissingCredential { .. } => false,
            LlmError::ContextOverflow { .. } => false,
            LlmError::InvalidResponse(_) => false,
            LlmError::Template(_) => false,
            LlmError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
