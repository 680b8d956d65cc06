//! Plan verifier
//!
//! Validates a parsed plan against the task registry before it is allowed
//! anywhere near execution. Verification failures are data, never errors:
//! an invalid plan is an expected, frequent outcome of generation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::step::{Plan, PlanStep, StepEntry};
use crate::tasks::TaskRegistry;

/// Why a step failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    MalformedStep,
    UnknownTask,
    MissingParameter,
    DanglingReference,
    CycleDetected,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedStep => write!(f, "malformed-step"),
            Self::UnknownTask => write!(f, "unknown-task"),
            Self::MissingParameter => write!(f, "missing-parameter"),
            Self::DanglingReference => write!(f, "dangling-reference"),
            Self::CycleDetected => write!(f, "cycle-detected"),
        }
    }
}

/// One attributable verification error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    pub step_index: usize,
    pub kind: ErrorKind,
    pub detail: String,
}

/// Structured outcome of validating a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub errors: Vec<StepError>,
}

impl Verdict {
    /// Errors recorded for one step
    pub fn errors_at(&self, step_index: usize) -> impl Iterator<Item = &StepError> {
        self.errors.iter().filter(move |e| e.step_index == step_index)
    }
}

/// Validate a plan against the registry
///
/// Rules, in order: step indices must be contiguous from 0; malformed
/// entries are rejected; every referenced task must exist; every required
/// parameter of a known task must be bound; every reference must name an
/// output declared by a strictly earlier step; and the reference graph must
/// be acyclic. The plan is valid iff no errors were recorded.
pub fn verify(plan: &Plan, registry: &TaskRegistry) -> Verdict {
    let mut errors = Vec::new();

    // Step indices must be contiguous from 0; every later rule compares
    // against the index field, so a disagreement with sequence position
    // invalidates the plan outright.
    for (position, entry) in plan.steps.iter().enumerate() {
        if entry.index() != position {
            errors.push(StepError {
                step_index: position,
                kind: ErrorKind::MalformedStep,
                detail: format!("step index {} out of sequence at position {position}", entry.index()),
            });
        }
    }

    // All declared outputs, in step order. Colliding identifiers are allowed
    // here; the graph check below deals with the consequences.
    let declared: Vec<(&str, usize)> = plan
        .steps()
        .filter_map(|s| s.produces.as_deref().map(|id| (id, s.index)))
        .collect();

    for entry in &plan.steps {
        match entry {
            StepEntry::Malformed { index, raw, detail } => {
                errors.push(StepError {
                    step_index: *index,
                    kind: ErrorKind::MalformedStep,
                    detail: format!("'{raw}': {detail}"),
                });
            }
            StepEntry::Step(step) => {
                check_step(step, registry, &declared, &mut errors);
            }
        }
    }

    check_cycles(plan, &declared, &mut errors);

    let valid = errors.is_empty();
    debug!(valid, error_count = errors.len(), "verified plan");
    Verdict { valid, errors }
}

fn check_step(step: &PlanStep, registry: &TaskRegistry, declared: &[(&str, usize)], errors: &mut Vec<StepError>) {
    match registry.lookup(&step.task_name) {
        None => {
            errors.push(StepError {
                step_index: step.index,
                kind: ErrorKind::UnknownTask,
                detail: format!("task '{}' is not in the registry", step.task_name),
            });
        }
        Some(descriptor) => {
            for param in descriptor.required_parameters() {
                if !step.arguments.contains_key(&param.name) {
                    errors.push(StepError {
                        step_index: step.index,
                        kind: ErrorKind::MissingParameter,
                        detail: format!("required parameter '{}' is not bound", param.name),
                    });
                }
            }
        }
    }

    for (param, value) in &step.arguments {
        if let Some(id) = value.as_reference()
            && !declared.iter().any(|(out, idx)| *out == id && *idx < step.index)
        {
            errors.push(StepError {
                step_index: step.index,
                kind: ErrorKind::DanglingReference,
                detail: format!("argument '{param}' references '{id}', which no earlier step produces"),
            });
        }
    }
}

/// Cycle check over the reference graph
///
/// Edges run from a consuming step to every step declaring the referenced
/// identifier, so colliding output identifiers can close a cycle even though
/// each individual reference resolves backwards. Only references that passed
/// the strictly-earlier check contribute edges; dangling references are
/// already reported above.
fn check_cycles(plan: &Plan, declared: &[(&str, usize)], errors: &mut Vec<StepError>) {
    let mut edges: HashMap<usize, Vec<usize>> = HashMap::new();

    for step in plan.steps() {
        for value in step.arguments.values() {
            let Some(id) = value.as_reference() else {
                continue;
            };
            if !declared.iter().any(|(out, idx)| *out == id && *idx < step.index) {
                continue;
            }
            for (out, idx) in declared {
                if *out == id {
                    edges.entry(step.index).or_default().push(*idx);
                }
            }
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut cycle_path = Vec::new();

    let mut nodes: Vec<usize> = edges.keys().copied().collect();
    nodes.sort_unstable();

    for node in nodes {
        if !visited.contains(&node) && has_cycle_dfs(node, &edges, &mut visited, &mut rec_stack, &mut cycle_path) {
            let step_index = cycle_path.first().copied().unwrap_or(node);
            let path = cycle_path
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            errors.push(StepError {
                step_index,
                kind: ErrorKind::CycleDetected,
                detail: format!("reference cycle through steps {path}"),
            });
            return;
        }
    }
}

/// DFS helper for cycle detection
fn has_cycle_dfs(
    node: usize,
    edges: &HashMap<usize, Vec<usize>>,
    visited: &mut HashSet<usize>,
    rec_stack: &mut HashSet<usize>,
    cycle_path: &mut Vec<usize>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    cycle_path.push(node);

    if let Some(next) = edges.get(&node) {
        for &dep in next {
            if !visited.contains(&dep) {
                if has_cycle_dfs(dep, edges, visited, rec_stack, cycle_path) {
                    return true;
                }
            } else if rec_stack.contains(&dep) {
                cycle_path.push(dep);
                return true;
            }
        }
    }

    rec_stack.remove(&node);
    cycle_path.pop();
    false
}
