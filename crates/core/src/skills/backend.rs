//! # Agent Backend
//!
//! The seam between the stages and whatever runs the model. Stages only see
//! structured results (or `None`); the coder session is opaque and receives
//! the project tools as its capability.
//!
//! [`RadkitBackend`] is the production implementation.

use crate::models::ModelConfig;
use crate::skills::coder_skill::CoderOutput;
use crate::skills::llm_helpers::with_llm;
use crate::skills::tools::create_coder_tools;
use crate::state::{ArchitectOutput, Plan};
use crate::tools::ProjectTools;
use anyhow::Result;
use async_trait::async_trait;
use radkit::agent::{LlmFunction, LlmWorker};

#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// One structured call producing a [`Plan`]
    async fn plan(&self, system_prompt: &'static str, input: String) -> Result<Option<Plan>>;

    /// One structured call producing the task list
    async fn task_plan(&self, system_prompt: &'static str, input: String)
        -> Result<Option<ArchitectOutput>>;

    /// Run one tool-using session to completion
    async fn code(
        &self,
        system_prompt: &'static str,
        input: String,
        tools: &ProjectTools,
    ) -> Result<CoderOutput>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Backend that calls the configured provider through radkit
#[derive(Debug, Clone)]
pub struct RadkitBackend {
    config: ModelConfig,
}

impl RadkitBackend {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentBackend for RadkitBackend {
    async fn plan(&self, system_prompt: &'static str, input: String) -> Result<Option<Plan>> {
        let plan = with_llm!(&self.config, llm => {
            LlmFunction::<Plan>::new_with_system_instructions(llm, system_prompt)
                .run(input)
                .await?
        });
        Ok(Some(plan))
    }

    async fn task_plan(
        &self,
        system_prompt: &'static str,
        input: String,
    ) -> Result<Option<ArchitectOutput>> {
        let output = with_llm!(&self.config, llm => {
            LlmFunction::<ArchitectOutput>::new_with_system_instructions(llm, system_prompt)
                .run(input)
                .await?
        });
        Ok(Some(output))
    }

    async fn code(
        &self,
        system_prompt: &'static str,
        input: String,
        tools: &ProjectTools,
    ) -> Result<CoderOutput> {
        let t = create_coder_tools(tools);
        let output = with_llm!(&self.config, llm => {
            LlmWorker::<CoderOutput>::builder(llm)
                .with_system_instructions(system_prompt)
                .with_tool(t.read_file)
                .with_tool(t.write_file)
                .with_tool(t.list_files)
                .with_tool(t.get_current_directory)
                .with_tool(t.run_cmd)
                .with_tool(t.print_tree)
                .build()
                .run(input)
                .await?
        });
        Ok(output)
    }

    fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.config.provider.display_name(),
            self.config.model
        )
    }
}
