//! Prompt templates
//!
//! Loads the planner prompt template from a directory override or falls back
//! to the embedded default, and renders it with the task catalog fragment.

use std::path::Path;

use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

pub mod embedded;

const SYSTEM_TEMPLATE: &str = "planner-system";

/// Context for rendering the planner system prompt
#[derive(Debug, Clone, Serialize)]
struct SystemContext<'a> {
    catalog: &'a str,
}

/// Loaded prompt set for the executive agent
pub struct PromptSet {
    handlebars: Handlebars<'static>,
}

impl PromptSet {
    /// Load templates, preferring `<dir>/planner-system.hbs` when present
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        let override_path = dir.map(|d| d.join("planner-system.hbs"));
        match override_path.filter(|p| p.exists()) {
            Some(path) => {
                handlebars
                    .register_template_file(SYSTEM_TEMPLATE, &path)
                    .context(format!("Failed to load prompt template from {}", path.display()))?;
                info!(path = %path.display(), "loaded planner system template");
            }
            None => {
                handlebars
                    .register_template_string(SYSTEM_TEMPLATE, embedded::PLANNER_SYSTEM)
                    .context("Failed to register embedded planner template")?;
                debug!("using embedded planner system template");
            }
        }

        Ok(Self { handlebars })
    }

    /// Render the system prompt with the task catalog fragment
    pub fn system_prompt(&self, catalog: &str) -> Result<String> {
        self.handlebars
            .render(SYSTEM_TEMPLATE, &SystemContext { catalog })
            .context("Failed to render planner system prompt")
    }

    /// Few-shot example pairs demonstrating the plan grammar
    pub fn examples(&self) -> Vec<(String, String)> {
        embedded::PLANNER_EXAMPLES
            .iter()
            .map(|(user, assistant)| (user.to_string(), assistant.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_embedded_template_renders_catalog() {
        let prompts = PromptSet::load(None).unwrap();
        let rendered = prompts.system_prompt("### search\nSearch things.\n").unwrap();

        assert!(rendered.contains("## Available Tasks"));
        assert!(rendered.contains("### search"));
        assert!(!rendered.contains("{{catalog}}"));
    }

    #[test]
    fn test_file_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("planner-system.hbs"), "CUSTOM: {{catalog}}").unwrap();

        let prompts = PromptSet::load(Some(dir.path())).unwrap();
        let rendered = prompts.system_prompt("the catalog").unwrap();
        assert_eq!(rendered, "CUSTOM: the catalog");
    }

    #[test]
    fn test_examples_alternate_and_parse() {
        let prompts = PromptSet::load(None).unwrap();
        let examples = prompts.examples();
        assert!(!examples.is_empty());

        // Every assistant example must itself parse as a plan
        for (_, assistant) in &examples {
            let plan = crate::plan::parse_plan(assistant);
            assert!(!plan.is_empty());
            assert_eq!(plan.steps().count(), plan.step_count());
        }
    }
}
