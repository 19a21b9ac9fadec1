//! # Architect Skill
//!
//! Decomposes a [`Plan`] into an ordered [`TaskPlan`] with one model call,
//! then attaches the plan back onto the result.

use crate::error::PipelineError;
use crate::skills::backend::AgentBackend;
use crate::skills::prompts::{architect_prompt, ARCHITECT};
use crate::state::{Plan, TaskPlan};
use anyhow::Context;

pub struct ArchitectSkill;

impl ArchitectSkill {
    /// SDK-style call for direct Coordinator integration.
    pub async fn run(plan: &Plan, backend: &dyn AgentBackend) -> anyhow::Result<TaskPlan> {
        let plan_json = serde_json::to_string(plan).context("Failed to serialize plan")?;

        let output = backend
            .task_plan(ARCHITECT, architect_prompt(&plan_json))
            .await?
            .ok_or(PipelineError::MissingResponse { stage: "architect" })?;

        let task_plan = TaskPlan::from(output).with_plan(plan.clone());
        tracing::info!(steps = task_plan.len(), "Task plan ready");
        Ok(task_plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::testing::{sample_plan, ScriptedBackend};

    #[tokio::test]
    async fn test_architect_attaches_plan() {
        let backend = ScriptedBackend::with_tasks(&["index.html", "script.js"]);
        let plan = sample_plan();

        let task_plan = ArchitectSkill::run(&plan, &backend).await.unwrap();
        assert_eq!(task_plan.len(), 2);
        assert_eq!(task_plan.plan.as_ref(), Some(&plan));

        // The model sees the plan as JSON
        let inputs = backend.task_plan_inputs();
        assert!(inputs[0].contains("\"techstack\""));
    }

    #[tokio::test]
    async fn test_architect_fails_on_missing_response() {
        let backend = ScriptedBackend {
            tasks: None,
            ..Default::default()
        };
        let err = ArchitectSkill::run(&sample_plan(), &backend)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingResponse { stage: "architect" })
        ));
    }
}
