//! Completion gateway
//!
//! Owns the backend client handle and converts provider failures into a
//! logged diagnostic plus an absent result, so transient backend faults
//! never escape to callers as faults.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::client::CompletionClient;
use super::error::LlmError;
use super::models::ModelKind;
use super::tokens::{HeuristicTokenizer, TokenBreakdown, Tokenizer, estimate_tokens};
use super::types::{ChatCompletion, compose_messages};
use crate::config::LlmConfig;

/// Deterministic decoding: reproducible plans over diversity
const PLAN_TEMPERATURE: f32 = 0.0;

/// Gateway to the completion backend
///
/// The client handle is constructed at most once, guarded by a one-time
/// initialization cell scoped to this gateway; concurrent first callers race
/// safely to a single instance. After construction the client is read-only.
pub struct ChatGateway {
    config: LlmConfig,
    client: OnceCell<Arc<dyn CompletionClient>>,
    tokenizer: Box<dyn Tokenizer>,
}

impl ChatGateway {
    /// Create a gateway that lazily constructs the backend client on first use
    pub fn from_config(config: LlmConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
            tokenizer: Box::new(HeuristicTokenizer),
        }
    }

    /// Create a gateway with an explicit, dependency-injected client
    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: LlmConfig::default(),
            client: OnceCell::new_with(Some(client)),
            tokenizer: Box::new(HeuristicTokenizer),
        }
    }

    /// Swap in an exact tokenizer for budgeting
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    async fn client(&self) -> Result<&Arc<dyn CompletionClient>, LlmError> {
        self.client
            .get_or_try_init(|| async {
                debug!(provider = %self.config.provider, "constructing backend client");
                super::create_client(&self.config)
            })
            .await
    }

    /// Per-block prompt token breakdown for diagnostics
    pub fn estimate(
        &self,
        system: Option<&str>,
        examples: &[(String, String)],
        user: &str,
        model: ModelKind,
    ) -> TokenBreakdown {
        estimate_tokens(system, examples, user, model, self.tokenizer.as_ref())
    }

    /// Pre-flight budget check
    ///
    /// Fails with `ContextOverflow` when the composed prompt does not fit the
    /// model's context window; callers use this to avoid a doomed request.
    pub fn preflight(
        &self,
        system: Option<&str>,
        examples: &[(String, String)],
        user: &str,
        model: ModelKind,
    ) -> Result<TokenBreakdown, LlmError> {
        let breakdown = self.estimate(system, examples, user, model);
        breakdown.check_fits(model)?;
        Ok(breakdown)
    }

    /// Send one completion request with deterministic decoding
    ///
    /// Makes exactly one backend call. Any backend failure is logged with a
    /// stable error-kind tag and reported as `None`: "no plan produced this
    /// round", not a crash. Retry policy belongs to the caller.
    pub async fn complete(
        &self,
        system: Option<&str>,
        examples: &[(String, String)],
        user: &str,
        model: ModelKind,
    ) -> Option<ChatCompletion> {
        let messages = compose_messages(system, examples, user);

        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "backend client unavailable");
                return None;
            }
        };

        match client.complete(model.id(), messages, PLAN_TEMPERATURE).await {
            Ok(completion) => {
                debug!(
                    id = %completion.id,
                    prompt_tokens = completion.usage.prompt_tokens,
                    completion_tokens = completion.usage.completion_tokens,
                    "completion succeeded"
                );
                Some(completion)
            }
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    transient = e.is_transient(),
                    error = %e,
                    "completion failed"
                );
                None
            }
        }
    }
}
