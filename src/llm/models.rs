//! Model profile table
//!
//! Static catalog of supported completion models with context-window sizes,
//! per-message token accounting constants, and pricing. Every enumerated
//! model resolves to exactly one profile; the table is exhaustive by
//! construction (a match over the closed enum).
//!
//! Fixed model versions are listed alongside the floating aliases because
//! only the fixed versions have guaranteed token accounting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed set of supported completion models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Gpt4o,
    Gpt4oMini,
    Gpt4Turbo,
    Gpt4TurboPreview,
    Gpt35Turbo,
    Gpt35Turbo0301,
    Gpt35Turbo0613,
    Gpt35Turbo16k,
    Gpt35Turbo16k0613,
    Gpt4,
    Gpt40314,
    Gpt40613,
    Gpt432k,
    Gpt432k0314,
    Gpt432k0613,
}

/// Immutable per-model accounting and pricing record
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    /// Human-readable name
    pub name: &'static str,

    /// Provider model identifier sent on the wire
    pub id: &'static str,

    /// USD per prompt token
    pub usd_per_prompt_token: f64,

    /// USD per completion token
    pub usd_per_completion_token: f64,

    /// Context window ceiling (prompt + completion)
    pub max_tokens: usize,

    /// Fixed token overhead added per message
    pub tokens_per_message: usize,

    /// Token adjustment when a message carries a name field
    ///
    /// Negative for gpt-3.5-turbo-0301, where a name replaces the role.
    pub tokens_per_name: i64,

    /// Date the provider retires the model, if announced
    pub retirement: Option<NaiveDate>,
}

impl ModelProfile {
    /// Prompt-side cost in USD for a given token count
    pub fn prompt_cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.usd_per_prompt_token
    }

    /// Completion-side cost in USD for a given token count
    pub fn completion_cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.usd_per_completion_token
    }
}

impl ModelKind {
    /// Every supported model, for catalog display and table validation
    pub fn all() -> &'static [ModelKind] {
        &[
            Self::Gpt4o,
            Self::Gpt4oMini,
            Self::Gpt4Turbo,
            Self::Gpt4TurboPreview,
            Self::Gpt35Turbo,
            Self::Gpt35Turbo0301,
            Self::Gpt35Turbo0613,
            Self::Gpt35Turbo16k,
            Self::Gpt35Turbo16k0613,
            Self::Gpt4,
            Self::Gpt40314,
            Self::Gpt40613,
            Self::Gpt432k,
            Self::Gpt432k0314,
            Self::Gpt432k0613,
        ]
    }

    /// Resolve this model's profile
    ///
    /// Floating aliases (gpt-3.5-turbo, gpt-4, gpt-4-32k) resolve to the
    /// fixed version with guaranteed token accounting.
    pub fn profile(self) -> ModelProfile {
        match self {
            Self::Gpt4o => ModelProfile {
                name: "GPT-4o",
                id: "gpt-4o",
                usd_per_prompt_token: 2.50 / 1_000_000.0,
                usd_per_completion_token: 10.00 / 1_000_000.0,
                max_tokens: 128_000,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: None,
            },
            Self::Gpt4oMini => ModelProfile {
                name: "GPT-4o Mini",
                id: "gpt-4o-mini",
                usd_per_prompt_token: 0.150 / 1_000_000.0,
                usd_per_completion_token: 0.600 / 1_000_000.0,
                max_tokens: 128_000,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: None,
            },
            Self::Gpt4Turbo => ModelProfile {
                name: "GPT-4 Turbo",
                id: "gpt-4-turbo",
                usd_per_prompt_token: 10.00 / 1_000_000.0,
                usd_per_completion_token: 30.00 / 1_000_000.0,
                max_tokens: 128_000,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: None,
            },
            Self::Gpt4TurboPreview => ModelProfile {
                name: "GPT-4 Turbo Preview",
                id: "gpt-4-turbo-preview",
                usd_per_prompt_token: 10.00 / 1_000_000.0,
                usd_per_completion_token: 30.00 / 1_000_000.0,
                max_tokens: 128_000,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: None,
            },
            Self::Gpt35Turbo0301 => ModelProfile {
                name: "GPT-3.5 Turbo (0301)",
                id: "gpt-3.5-turbo-0301",
                usd_per_prompt_token: 0.0015 / 1000.0,
                usd_per_completion_token: 0.002 / 1000.0,
                max_tokens: 4096,
                tokens_per_message: 4,
                tokens_per_name: -1,
                retirement: NaiveDate::from_ymd_opt(2024, 9, 13),
            },
            Self::Gpt35Turbo | Self::Gpt35Turbo0613 => ModelProfile {
                name: "GPT-3.5 Turbo (0613)",
                id: "gpt-3.5-turbo-0613",
                usd_per_prompt_token: 0.0015 / 1000.0,
                usd_per_completion_token: 0.002 / 1000.0,
                max_tokens: 4096,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2024, 9, 13),
            },
            Self::Gpt35Turbo16k | Self::Gpt35Turbo16k0613 => ModelProfile {
                name: "GPT-3.5 Turbo 16k (0613)",
                id: "gpt-3.5-turbo-16k-0613",
                usd_per_prompt_token: 0.003 / 1000.0,
                usd_per_completion_token: 0.004 / 1000.0,
                max_tokens: 16_384,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2024, 9, 13),
            },
            Self::Gpt40314 => ModelProfile {
                name: "GPT-4 (0314)",
                id: "gpt-4-0314",
                usd_per_prompt_token: 0.03 / 1000.0,
                usd_per_completion_token: 0.06 / 1000.0,
                max_tokens: 8192,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2024, 6, 13),
            },
            Self::Gpt4 | Self::Gpt40613 => ModelProfile {
                name: "GPT-4 (0613)",
                id: "gpt-4-0613",
                usd_per_prompt_token: 0.03 / 1000.0,
                usd_per_completion_token: 0.06 / 1000.0,
                max_tokens: 8192,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2025, 6, 13),
            },
            Self::Gpt432k0314 => ModelProfile {
                name: "GPT-4 32k (0314)",
                id: "gpt-4-32k-0314",
                usd_per_prompt_token: 0.06 / 1000.0,
                usd_per_completion_token: 0.12 / 1000.0,
                max_tokens: 32_768,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2024, 6, 13),
            },
            Self::Gpt432k | Self::Gpt432k0613 => ModelProfile {
                name: "GPT-4 32k (0613)",
                id: "gpt-4-32k-0613",
                usd_per_prompt_token: 0.06 / 1000.0,
                usd_per_completion_token: 0.12 / 1000.0,
                max_tokens: 32_768,
                tokens_per_message: 3,
                tokens_per_name: 1,
                retirement: NaiveDate::from_ymd_opt(2025, 6, 13),
            },
        }
    }

    /// Provider identifier for this model
    pub fn id(self) -> &'static str {
        self.profile().id
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
