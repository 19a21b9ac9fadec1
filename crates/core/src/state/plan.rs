//! # Plan Models
//!
//! The planner's app description and the architect's ordered task list.
//! Both are produced by structured model calls, so they carry JSON schemas.

use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// High-level description of the application to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct Plan {
    /// The name of the app to be built
    pub name: String,
    /// A short description of the app to be built, eg: A workout buddy
    pub description: String,
    /// The tech stack of the app to be built
    pub techstack: String,
    /// A list of features the app should have
    pub features: String,
    /// A list of files to be created for the application
    pub files: String,
}

/// One unit of work for the coder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ImplementationTask {
    /// The path of the file to be built, relative to the project root
    pub filepath: String,
    /// A detailed description of the task to be implemented
    pub task_description: String,
}

/// What the architect model is asked to return
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ArchitectOutput {
    /// Ordered steps, one file each
    pub implementation_steps: Vec<ImplementationTask>,
}

/// Ordered implementation tasks plus the plan they came from.
///
/// Unknown fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub implementation_steps: Vec<ImplementationTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

impl TaskPlan {
    pub fn new(implementation_steps: Vec<ImplementationTask>) -> Self {
        Self {
            implementation_steps,
            plan: None,
        }
    }

    /// Attach the originating plan
    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn len(&self) -> usize {
        self.implementation_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementation_steps.is_empty()
    }
}

impl From<ArchitectOutput> for TaskPlan {
    fn from(output: ArchitectOutput) -> Self {
        TaskPlan::new(output.implementation_steps)
    }
}
