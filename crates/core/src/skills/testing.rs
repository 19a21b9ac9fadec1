//! Scripted backend for stage and coordinator tests.

use crate::skills::backend::AgentBackend;
use crate::skills::coder_skill::CoderOutput;
use crate::state::{ArchitectOutput, ImplementationTask, Plan};
use crate::tools::ProjectTools;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub fn sample_plan() -> Plan {
    Plan {
        name: "Calculator".to_string(),
        description: "A simple web calculator".to_string(),
        techstack: "HTML, CSS, JavaScript".to_string(),
        features: "add, subtract, multiply, divide, clear".to_string(),
        files: "index.html, style.css, script.js".to_string(),
    }
}

/// Returns canned results and records every input it was given.
/// The coder session writes `// <task description>` to the task's file.
pub struct ScriptedBackend {
    pub(crate) plan: Option<Plan>,
    pub(crate) tasks: Option<ArchitectOutput>,
    pub(crate) write_files: bool,
    pub(crate) fail_code: bool,
    pub(crate) plan_calls: Mutex<Vec<String>>,
    pub(crate) task_plan_calls: Mutex<Vec<String>>,
    pub(crate) code_calls: Mutex<Vec<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::with_tasks(&["index.html", "script.js"])
    }
}

impl ScriptedBackend {
    pub fn with_tasks(files: &[&str]) -> Self {
        Self {
            plan: Some(sample_plan()),
            tasks: Some(ArchitectOutput {
                implementation_steps: files
                    .iter()
                    .map(|f| ImplementationTask {
                        filepath: f.to_string(),
                        task_description: format!("write {f}"),
                    })
                    .collect(),
            }),
            write_files: true,
            fail_code: false,
            plan_calls: Mutex::new(Vec::new()),
            task_plan_calls: Mutex::new(Vec::new()),
            code_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn plan_inputs(&self) -> Vec<String> {
        self.plan_calls.lock().unwrap().clone()
    }

    pub fn task_plan_inputs(&self) -> Vec<String> {
        self.task_plan_calls.lock().unwrap().clone()
    }

    pub fn code_inputs(&self) -> Vec<String> {
        self.code_calls.lock().unwrap().clone()
    }
}

fn line_value<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    input.lines().find_map(|l| l.strip_prefix(prefix))
}

#[async_trait]
impl AgentBackend for ScriptedBackend {
    async fn plan(&self, _system_prompt: &'static str, input: String) -> Result<Option<Plan>> {
        self.plan_calls.lock().unwrap().push(input);
        Ok(self.plan.clone())
    }

    async fn task_plan(
        &self,
        _system_prompt: &'static str,
        input: String,
    ) -> Result<Option<ArchitectOutput>> {
        self.task_plan_calls.lock().unwrap().push(input);
        Ok(self.tasks.clone())
    }

    async fn code(
        &self,
        _system_prompt: &'static str,
        input: String,
        tools: &ProjectTools,
    ) -> Result<CoderOutput> {
        self.code_calls.lock().unwrap().push(input.clone());
        if self.fail_code {
            anyhow::bail!("provider unavailable");
        }

        let mut files_written = Vec::new();
        if self.write_files {
            if let (Some(file), Some(task)) =
                (line_value(&input, "File: "), line_value(&input, "Task: "))
            {
                tools.write_file(file, &format!("// {task}\n"))?;
                files_written.push(file.to_string());
            }
        }
        Ok(CoderOutput {
            summary: "done".to_string(),
            files_written,
        })
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
