//! Task registry
//!
//! Static catalog of the tasks the planner is allowed to invoke, with their
//! parameter schemas. Loaded once at startup and read-only afterward, so it
//! is safely shared across concurrent verifications without locking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry construction errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate task name: {0}")]
    DuplicateTask(String),
}

/// Parameter value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// One parameter of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamType,
    pub required: bool,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// Capability descriptor for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Unique task name
    pub name: String,

    /// What the task does, shown to the model in the catalog fragment
    pub description: String,

    /// Ordered parameter schema
    pub parameters: Vec<ParameterSpec>,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Names of parameters that must be bound in every invocation
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.required)
    }
}

/// Catalog of task names to capability descriptors
///
/// Insertion order is preserved so the rendered catalog fragment is stable.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskDescriptor>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, rejecting duplicate names
    pub fn from_tasks(tasks: Vec<TaskDescriptor>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for task in tasks {
            registry.register(task)?;
        }
        Ok(registry)
    }

    /// Register a task; names must be unique across the registry
    pub fn register(&mut self, task: TaskDescriptor) -> Result<(), RegistryError> {
        if self.exists(&task.name) {
            return Err(RegistryError::DuplicateTask(task.name));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Look up a task by name
    ///
    /// An absent name is a recoverable condition the verifier reports as
    /// `UnknownTask`, never a fatal error.
    pub fn lookup(&self, name: &str) -> Option<&TaskDescriptor> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.tasks.iter()
    }

    /// Render the catalog fragment embedded in the planner system prompt
    pub fn describe(&self) -> String {
        let mut out = String::new();

        for task in &self.tasks {
            out.push_str(&format!("### {}\n", task.name));
            out.push_str(&format!("{}\n", task.description));

            if task.parameters.is_empty() {
                out.push_str("Parameters: none\n");
            } else {
                out.push_str("Parameters:\n");
                for param in &task.parameters {
                    let requirement = if param.required { "required" } else { "optional" };
                    out.push_str(&format!("- {}: {} ({})\n", param.name, param.kind, requirement));
                }
            }
            out.push('\n');
        }

        out
    }
}
