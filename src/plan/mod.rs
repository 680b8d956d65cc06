//! Plan parsing and verification
//!
//! The parser turns raw model output into an ordered sequence of task
//! invocations; the verifier checks that sequence against the task registry
//! and returns a structured verdict.

mod parser;
mod step;
mod verifier;

pub use parser::parse_plan;
pub use step::{ArgValue, Plan, PlanStep, StepEntry};
pub use verifier::{ErrorKind, StepError, Verdict, verify};
