//! Token budget estimation
//!
//! Counts prompt tokens per message block using the model profile's fixed
//! per-message and per-name overheads, and checks the total against the
//! model's context window before a request is sent.

use tracing::debug;

use super::error::LlmError;
use super::models::{ModelKind, ModelProfile};
use super::types::{ChatMessage, compose_examples, compose_messages, compose_system, compose_user};

/// Fixed overhead the backend adds to prime the assistant's reply
pub const ASSISTANT_PRIMING_TOKENS: usize = 3;

/// Content token counting contract
///
/// Implementations count tokens for raw text only; message framing overhead
/// is applied by [`count_tokens`] from the model profile.
pub trait Tokenizer: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Word-length BPE heuristic
///
/// Approximates BPE tokenizers without vendoring vocabulary files: short
/// words cost one token, longer words and identifiers cost more.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.split_whitespace()
            .map(|word| match word.len() {
                0 => 0,
                1..=3 => 1,
                4..=7 => 2,
                8..=15 => 3,
                len => len.div_ceil(4),
            })
            .sum()
    }
}

/// Count prompt tokens for a message list under a model's accounting scheme
///
/// Adds `tokens_per_message` per message, `tokens_per_name` when a message
/// carries a name, and the assistant priming overhead when requested.
pub fn count_tokens(
    messages: &[ChatMessage],
    profile: &ModelProfile,
    tokenizer: &dyn Tokenizer,
    count_priming_tokens: bool,
) -> usize {
    let mut total: i64 = 0;

    for message in messages {
        total += profile.tokens_per_message as i64;
        total += tokenizer.count(&message.content) as i64;
        if let Some(name) = &message.name {
            total += tokenizer.count(name) as i64;
            total += profile.tokens_per_name;
        }
    }

    if count_priming_tokens {
        total += ASSISTANT_PRIMING_TOKENS as i64;
    }

    total.max(0) as usize
}

/// Per-block prompt token breakdown for diagnostics and pre-flight checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBreakdown {
    pub system: usize,
    pub examples: usize,
    pub user: usize,

    /// Full prompt including assistant priming overhead
    pub total_prompt: usize,

    /// Context window ceiling for the model
    pub model_max: usize,
}

impl TokenBreakdown {
    /// Fail with `ContextOverflow` when the prompt does not fit the window
    pub fn check_fits(&self, model: ModelKind) -> Result<(), LlmError> {
        if self.total_prompt >= self.model_max {
            return Err(LlmError::ContextOverflow {
                prompt_tokens: self.total_prompt,
                max_tokens: self.model_max,
                model: model.id().to_string(),
            });
        }
        Ok(())
    }
}

/// Estimate prompt tokens per block for a composed conversation
pub fn estimate_tokens(
    system: Option<&str>,
    examples: &[(String, String)],
    user: &str,
    model: ModelKind,
    tokenizer: &dyn Tokenizer,
) -> TokenBreakdown {
    let profile = model.profile();

    let breakdown = TokenBreakdown {
        system: count_tokens(&compose_system(system), &profile, tokenizer, false),
        examples: count_tokens(&compose_examples(examples), &profile, tokenizer, false),
        user: count_tokens(&compose_user(user), &profile, tokenizer, false),
        total_prompt: count_tokens(&compose_messages(system, examples, user), &profile, tokenizer, true),
        model_max: profile.max_tokens,
    };

    debug!(
        system = breakdown.system,
        examples = breakdown.examples,
        user = breakdown.user,
        total_prompt = breakdown.total_prompt,
        model_max = breakdown.model_max,
        "estimated prompt tokens"
    );

    breakdown
}
