//! execplan - LLM executive agent planning pipeline
//!
//! Turns a natural-language query into a validated, structured execution
//! plan over a fixed catalog of known tasks. The pipeline composes a
//! budgeted planner prompt, sends it to a completion backend with
//! deterministic decoding, parses the returned plan text, and verifies
//! every step against the task registry before anything may execute it.
//!
//! # Core Concepts
//!
//! - **Plans are data**: parsing and verification failures are structured
//!   verdicts, never faults; an invalid plan is an expected outcome of
//!   probabilistic generation
//! - **Budget before sending**: prompt tokens are estimated per block and
//!   checked against the model's context window pre-flight
//! - **Normalize at the boundary**: provider responses are copied into one
//!   internal shape; backend faults become a logged diagnostic plus an
//!   absent result
//!
//! # Modules
//!
//! - [`llm`] - message composition, token budgeting, completion gateway
//! - [`tasks`] - task registry and catalog rendering
//! - [`plan`] - plan parser and verifier
//! - [`prompts`] - planner prompt templates
//! - [`agent`] - the executive agent orchestrator
//! - [`extract`] - document extractor fan-out (separate subsystem)
//! - [`config`] - configuration types and loading

pub mod agent;
pub mod config;
pub mod extract;
pub mod llm;
pub mod logging;
pub mod plan;
pub mod prompts;
pub mod tasks;

// Re-export commonly used types
pub use agent::{ExecutiveAgent, PlanOutcome};
pub use config::{Config, LlmConfig};
pub use llm::{
    ChatCompletion, ChatGateway, ChatMessage, CompletionClient, LlmError, ModelKind, ModelProfile, TokenBreakdown,
    Tokenizer, estimate_tokens,
};
pub use plan::{ArgValue, ErrorKind, Plan, PlanStep, StepEntry, StepError, Verdict, parse_plan, verify};
pub use prompts::PromptSet;
pub use tasks::{ParamType, ParameterSpec, RegistryError, TaskDescriptor, TaskRegistry};
