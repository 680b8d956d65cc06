//! Plan data model
//!
//! A plan is an ordered sequence of task invocations parsed from the model's
//! free-form output, kept alongside the verbatim raw text it came from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An argument bound in a plan step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum ArgValue {
    /// Literal value, kept as written
    Literal(String),

    /// Reference to an earlier step's declared output
    Reference(String),
}

impl ArgValue {
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(id) => Some(id),
            Self::Literal(_) => None,
        }
    }
}

/// One parsed task invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// 0-based sequence position
    pub index: usize,

    /// Name of the task to invoke
    pub task_name: String,

    /// Parameter bindings, literal or referential
    pub arguments: BTreeMap<String, ArgValue>,

    /// Output identifier this step declares, if any
    pub produces: Option<String>,
}

/// A plan entry: either a well-formed step or a fragment that looked like an
/// invocation but did not match the expected shape
///
/// Malformed entries keep their sequence position so the verifier can report
/// attributable per-step errors instead of an opaque parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEntry {
    Step(PlanStep),
    Malformed { index: usize, raw: String, detail: String },
}

impl StepEntry {
    pub fn index(&self) -> usize {
        match self {
            Self::Step(step) => step.index,
            Self::Malformed { index, .. } => *index,
        }
    }

    pub fn as_step(&self) -> Option<&PlanStep> {
        match self {
            Self::Step(step) => Some(step),
            Self::Malformed { .. } => None,
        }
    }
}

/// Ordered sequence of plan entries plus the raw text they were parsed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<StepEntry>,
    pub raw: String,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Well-formed steps in order
    pub fn steps(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter_map(StepEntry::as_step)
    }
}
