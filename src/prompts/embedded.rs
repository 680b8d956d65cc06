//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not
//! found in the configured prompts directory.

/// System prompt template for the planner; `{{catalog}}` receives the task
/// registry's rendered catalog fragment.
pub const PLANNER_SYSTEM: &str = r#"You are an executive agent that turns a user request into a step-by-step plan.

You may only use the tasks listed in the catalog below. Write each step on
its own line, in execution order, using exactly this shape:

  1. task_name(parameter="value", other=$R1) -> R2

Rules:
- Bind every required parameter of a task you invoke.
- Quote literal string values; bare tokens are allowed for numbers and booleans.
- Name a step's output with ` -> IDENTIFIER` only when a later step needs it.
- Refer to an earlier step's output as $IDENTIFIER; never refer to an output
  that has not been produced yet.
- Do not invent tasks, and output nothing but the numbered steps.

## Available Tasks

{{catalog}}
"#;

/// Few-shot example pairs demonstrating the plan grammar
pub const PLANNER_EXAMPLES: &[(&str, &str)] = &[
    (
        "Find articles about rust web frameworks and give me a short summary.",
        "1. search(query=\"rust web frameworks\") -> R1\n\
         2. summarize(text=$R1) -> R2",
    ),
    (
        "What does our handbook say about remote work?",
        "1. search(query=\"handbook remote work policy\") -> R1",
    ),
];
