//! # Planner Skill
//!
//! Maps a free-text user request to a structured [`Plan`] with one model
//! call. No retries.

use crate::error::PipelineError;
use crate::skills::backend::AgentBackend;
use crate::skills::prompts::{planner_prompt, PLANNER};
use crate::state::Plan;

pub struct PlannerSkill;

impl PlannerSkill {
    /// SDK-style call for direct Coordinator integration.
    pub async fn run(user_prompt: &str, backend: &dyn AgentBackend) -> anyhow::Result<Plan> {
        let plan = backend
            .plan(PLANNER, planner_prompt(user_prompt))
            .await?
            .ok_or(PipelineError::MissingResponse { stage: "planner" })?;

        tracing::info!(app = %plan.name, techstack = %plan.techstack, "Plan ready");
        Ok(plan)
    }
}
