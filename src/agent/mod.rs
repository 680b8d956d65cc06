//! Executive agent orchestrator
//!
//! Wires the pipeline into one call: compose the planner conversation around
//! the task catalog, send it through the gateway, parse the returned plan
//! text, and verify it against the registry.

use tracing::{info, warn};

use crate::llm::{ChatGateway, LlmError, ModelKind, TokenBreakdown};
use crate::plan::{Plan, Verdict, parse_plan, verify};
use crate::prompts::PromptSet;
use crate::tasks::TaskRegistry;

/// A parsed plan together with its validity verdict
///
/// The orchestrator never drops information about why a plan failed: callers
/// get either this pair or an explicit "no plan" outcome.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: Plan,
    pub verdict: Verdict,
}

impl PlanOutcome {
    /// Only valid plans are fit for downstream execution
    pub fn is_valid(&self) -> bool {
        self.verdict.valid
    }
}

/// LLM-driven planner over a fixed task catalog
pub struct ExecutiveAgent {
    gateway: ChatGateway,
    registry: TaskRegistry,
    prompts: PromptSet,
    model: ModelKind,
}

impl ExecutiveAgent {
    pub fn new(gateway: ChatGateway, registry: TaskRegistry, prompts: PromptSet, model: ModelKind) -> Self {
        Self {
            gateway,
            registry,
            prompts,
            model,
        }
    }

    /// Produce a verified plan for a natural-language query
    ///
    /// Returns `None` when the backend produced no completion this round;
    /// the gateway has already logged why. No retries happen here; retry
    /// policy belongs to the caller.
    pub async fn plan_for(&self, query: &str) -> Option<PlanOutcome> {
        let system = match self.system_prompt() {
            Ok(system) => system,
            Err(e) => {
                warn!(error = %e, "failed to render planner system prompt");
                return None;
            }
        };
        let examples = self.prompts.examples();

        let completion = self.gateway.complete(Some(&system), &examples, query, self.model).await?;

        let Some(raw_plan) = completion.top_content() else {
            warn!(id = %completion.id, "completion carried no plan text");
            return None;
        };

        let plan = parse_plan(raw_plan);
        let verdict = verify(&plan, &self.registry);

        info!(
            steps = plan.step_count(),
            valid = verdict.valid,
            errors = verdict.errors.len(),
            "planned query"
        );

        Some(PlanOutcome { plan, verdict })
    }

    /// Pre-flight token breakdown for the composed planner prompt
    pub fn estimate_tokens(&self, query: &str) -> Result<TokenBreakdown, LlmError> {
        let system = self.system_prompt().map_err(|e| LlmError::Template(e.to_string()))?;
        let examples = self.prompts.examples();
        Ok(self.gateway.estimate(Some(&system), &examples, query, self.model))
    }

    /// Pre-flight budget check; fails with `ContextOverflow` when the prompt
    /// cannot fit the model's context window
    pub fn preflight(&self, query: &str) -> Result<TokenBreakdown, LlmError> {
        let breakdown = self.estimate_tokens(query)?;
        breakdown.check_fits(self.model)?;
        Ok(breakdown)
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    fn system_prompt(&self) -> eyre::Result<String> {
        self.prompts.system_prompt(&self.registry.describe())
    }
}
