//! # Coder Skill
//!
//! Implements one task per call against the project on disk.
//!
//! Each step reads whatever already exists at the task's file, hands the
//! task plus that content to a tool-using session, and moves the cursor on
//! by one once the session returns. What the session did with its tools is
//! not inspected here.

use crate::skills::backend::AgentBackend;
use crate::skills::prompts::{coder_prompt, CODER};
use crate::state::CoderState;
use crate::tools::ProjectTools;
use anyhow::Context;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the coder session reports when it finishes
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct CoderOutput {
    /// Summary of changes made
    pub summary: String,
    /// Files written during the session
    #[serde(default)]
    pub files_written: Vec<String>,
}

/// Outcome of one coder invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoderStep {
    /// A task was run; `index` is the step that was just implemented
    Advanced { index: usize, filepath: String },
    /// No steps remain
    Done,
}

impl CoderStep {
    pub fn is_done(&self) -> bool {
        matches!(self, CoderStep::Done)
    }
}

pub struct CoderSkill;

impl CoderSkill {
    /// Run the next task in `state`, or report that none remain.
    pub async fn step(
        state: &mut CoderState,
        tools: &ProjectTools,
        backend: &dyn AgentBackend,
    ) -> anyhow::Result<CoderStep> {
        let index = state.current_step_idx();
        let task = match state.current_task() {
            Some(task) => task.clone(),
            None => {
                tracing::info!(steps = state.total_steps(), "Coder completed all steps");
                return Ok(CoderStep::Done);
            }
        };

        tracing::info!(
            step = index + 1,
            of = state.total_steps(),
            file = %task.filepath,
            "Coder step started"
        );

        tools.init_root().context("Failed to create project root")?;
        let existing = tools
            .read_file(&task.filepath)
            .with_context(|| format!("Failed to read '{}'", task.filepath))?;
        state.current_file_content = Some(existing.clone());

        let output = backend
            .code(CODER, coder_prompt(&task, &existing), tools)
            .await
            .with_context(|| format!("Coder session failed on '{}'", task.filepath))?;

        tracing::debug!(summary = %output.summary, files = ?output.files_written, "Coder session finished");

        state.advance();
        Ok(CoderStep::Advanced {
            index,
            filepath: task.filepath,
        })
    }
}
