//! # Coordinator
//!
//! Drives one run: planner, architect, then the coder once per task until
//! it reports that nothing is left. Stages run strictly one after another.
//! Any stage error fails the run; there are no retries.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::PipelineConfig;
use crate::skills::{
    AgentBackend, ArchitectSkill, CoderSkill, CoderStep, PlannerSkill, RadkitBackend,
};
use crate::state::{CoderState, Plan, TaskPlan};
use crate::tools::ProjectTools;

use super::events::{PipelineEvent, PipelineEventKind};
use super::pipeline::{Pipeline, PipelineStage};

/// Result of a finished run
#[derive(Debug)]
pub struct PipelineResult {
    pub plan: Plan,
    pub task_plan: TaskPlan,
    /// Tasks the coder ran
    pub steps_completed: usize,
    pub events: Vec<PipelineEvent>,
}

pub struct Coordinator {
    backend: Arc<dyn AgentBackend>,
    tools: ProjectTools,
    pipeline: Pipeline,
    events: Vec<PipelineEvent>,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
    plan: Option<Plan>,
    task_plan: Option<TaskPlan>,
    coder_state: Option<CoderState>,
}

impl Coordinator {
    /// Coordinator talking to the configured provider
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_backend(config, Arc::new(RadkitBackend::new(config.model.clone())))
    }

    pub fn with_backend(config: &PipelineConfig, backend: Arc<dyn AgentBackend>) -> Self {
        let tools = ProjectTools::new(&config.project_root)
            .with_command_timeout(config.command_timeout());
        Self {
            backend,
            tools,
            pipeline: Pipeline::new(),
            events: Vec::new(),
            event_tx: None,
            plan: None,
            task_plan: None,
            coder_state: None,
        }
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn tools(&self) -> &ProjectTools {
        &self.tools
    }

    pub fn stage(&self) -> PipelineStage {
        self.pipeline.stage
    }

    pub fn coder_state(&self) -> Option<&CoderState> {
        self.coder_state.as_ref()
    }

    pub fn events(&self) -> &[PipelineEvent] {
        &self.events
    }

    async fn emit(&mut self, mut event: PipelineEvent) {
        event.seq = self.events.len() as u64;
        tracing::debug!(kind = ?event.kind, agent = %event.agent, progress = ?event.progress, "event");
        self.events.push(event.clone());
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    async fn fail_stage(&mut self, stage: PipelineStage, err: &anyhow::Error) {
        self.pipeline.fail();
        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentFailed, stage.agent())
                .with_message(format!("{err:#}")),
        )
        .await;
    }

    fn expect_stage(&self, expected: PipelineStage) -> Result<()> {
        if self.pipeline.stage != expected {
            anyhow::bail!(
                "Cannot run {:?} while pipeline is in {:?}",
                expected,
                self.pipeline.stage
            );
        }
        Ok(())
    }

    /// Run the whole pipeline on a user request
    #[tracing::instrument(skip(self), fields(prompt_preview = %prompt.chars().take(50).collect::<String>()))]
    pub async fn run(&mut self, prompt: &str) -> Result<PipelineResult> {
        if self.pipeline.is_complete() {
            anyhow::bail!("Pipeline already finished ({:?})", self.pipeline.stage);
        }
        self.emit(PipelineEvent::new(
            PipelineEventKind::PipelineStarted,
            "coordinator",
        ))
        .await;

        let outcome = self.drive(prompt).await;

        match outcome {
            Ok(steps_completed) => {
                self.emit(
                    PipelineEvent::new(PipelineEventKind::PipelineCompleted, "coordinator")
                        .with_progress(100)
                        .with_data(serde_json::json!({ "steps_completed": steps_completed })),
                )
                .await;

                let plan = self.plan.clone().context("Pipeline finished without a plan")?;
                let task_plan = self
                    .task_plan
                    .clone()
                    .context("Pipeline finished without a task plan")?;
                Ok(PipelineResult {
                    plan,
                    task_plan,
                    steps_completed,
                    events: self.events.clone(),
                })
            }
            Err(e) => {
                self.pipeline.fail();
                tracing::warn!(error = %format!("{e:#}"), "Pipeline failed");
                self.emit(
                    PipelineEvent::new(PipelineEventKind::PipelineFailed, "coordinator")
                        .with_message(format!("{e:#}")),
                )
                .await;
                Err(e)
            }
        }
    }

    async fn drive(&mut self, prompt: &str) -> Result<usize> {
        self.plan(prompt).await?;
        self.architect().await?;

        let mut steps = 0;
        while !self.code_step().await?.is_done() {
            steps += 1;
        }
        Ok(steps)
    }

    /// Stage 1: user request → Plan
    pub async fn plan(&mut self, prompt: &str) -> Result<Plan> {
        self.expect_stage(PipelineStage::Planning)?;
        self.emit(PipelineEvent::new(PipelineEventKind::AgentStarted, "planner").with_progress(0))
            .await;

        let backend = Arc::clone(&self.backend);
        let result = PlannerSkill::run(prompt, backend.as_ref())
            .await
            .with_context(|| format!("Planner failed ({})", backend.describe()));

        let plan = match result {
            Ok(plan) => plan,
            Err(e) => {
                self.fail_stage(PipelineStage::Planning, &e).await;
                return Err(e);
            }
        };

        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentCompleted, "planner")
                .with_progress(100)
                .with_data(serde_json::to_value(&plan)?),
        )
        .await;

        self.plan = Some(plan.clone());
        self.pipeline.advance();
        Ok(plan)
    }

    /// Stage 2: Plan → TaskPlan
    pub async fn architect(&mut self) -> Result<TaskPlan> {
        self.expect_stage(PipelineStage::Architecting)?;
        let plan = self.plan.clone().context("No plan; run the planner first")?;

        self.emit(PipelineEvent::new(PipelineEventKind::AgentStarted, "architect").with_progress(0))
            .await;

        let backend = Arc::clone(&self.backend);
        let result = ArchitectSkill::run(&plan, backend.as_ref())
            .await
            .with_context(|| format!("Architect failed ({})", backend.describe()));

        let task_plan = match result {
            Ok(task_plan) => task_plan,
            Err(e) => {
                self.fail_stage(PipelineStage::Architecting, &e).await;
                return Err(e);
            }
        };

        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentCompleted, "architect")
                .with_progress(100)
                .with_data(serde_json::json!({
                    "steps": task_plan
                        .implementation_steps
                        .iter()
                        .map(|t| t.filepath.as_str())
                        .collect::<Vec<_>>()
                })),
        )
        .await;

        self.task_plan = Some(task_plan.clone());
        self.pipeline.advance();
        Ok(task_plan)
    }

    /// Stage 3: one coder invocation. Returns `Done` once every task ran.
    pub async fn code_step(&mut self) -> Result<CoderStep> {
        self.expect_stage(PipelineStage::Coding)?;

        let mut state = match self.coder_state.take() {
            Some(state) => state,
            None => {
                let task_plan = self
                    .task_plan
                    .clone()
                    .context("No task plan; run the architect first")?;
                self.emit(
                    PipelineEvent::new(PipelineEventKind::AgentStarted, "coder")
                        .with_progress(0)
                        .with_data(serde_json::json!({ "total_steps": task_plan.len() })),
                )
                .await;
                CoderState::new(task_plan)
            }
        };

        if let Some(task) = state.current_task() {
            let event = PipelineEvent::new(PipelineEventKind::StepStarted, "coder")
                .with_progress(state.percent_complete())
                .with_message(task.filepath.clone())
                .with_data(serde_json::json!({
                    "index": state.current_step_idx(),
                    "total_steps": state.total_steps()
                }));
            self.emit(event).await;
        }

        let backend = Arc::clone(&self.backend);
        let result = CoderSkill::step(&mut state, &self.tools, backend.as_ref()).await;
        let progress = state.percent_complete();
        self.coder_state = Some(state);

        match result {
            Ok(CoderStep::Advanced { index, filepath }) => {
                self.pipeline.coder_step(false);
                self.emit(
                    PipelineEvent::new(PipelineEventKind::StepCompleted, "coder")
                        .with_progress(progress)
                        .with_message(filepath.clone())
                        .with_data(serde_json::json!({ "index": index })),
                )
                .await;
                Ok(CoderStep::Advanced { index, filepath })
            }
            Ok(CoderStep::Done) => {
                self.pipeline.coder_step(true);
                self.emit(
                    PipelineEvent::new(PipelineEventKind::AgentCompleted, "coder").with_progress(100),
                )
                .await;
                Ok(CoderStep::Done)
            }
            Err(e) => {
                self.fail_stage(PipelineStage::Coding, &e).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::testing::ScriptedBackend;

    fn config(dir: &tempfile::TempDir) -> PipelineConfig {
        PipelineConfig {
            project_root: dir.path().join("generated_project"),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_implements_every_task() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_tasks(&["index.html", "style.css", "script.js"]));
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend.clone());

        let result = coordinator.run("build a calculator").await.unwrap();

        assert_eq!(result.steps_completed, 3);
        assert_eq!(result.plan.name, "Calculator");
        assert_eq!(result.task_plan.plan.as_ref(), Some(&result.plan));
        assert_eq!(coordinator.stage(), PipelineStage::Complete);
        assert_eq!(backend.code_inputs().len(), 3);
        assert_eq!(
            coordinator.tools().list_files(".").unwrap(),
            "index.html\nscript.js\nstyle.css"
        );

        let kinds: Vec<_> = result.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds.first(), Some(&PipelineEventKind::PipelineStarted));
        assert_eq!(kinds.last(), Some(&PipelineEventKind::PipelineCompleted));
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == PipelineEventKind::StepCompleted)
                .count(),
            3
        );
        assert!(result.events.windows(2).all(|w| w[0].seq + 1 == w[1].seq));
    }

    #[tokio::test]
    async fn test_code_step_counts() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_tasks(&["a.js", "b.js"]));
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend);

        coordinator.plan("two files").await.unwrap();
        coordinator.architect().await.unwrap();

        assert!(!coordinator.code_step().await.unwrap().is_done());
        assert_eq!(coordinator.coder_state().unwrap().current_step_idx(), 1);
        assert!(!coordinator.code_step().await.unwrap().is_done());
        assert_eq!(coordinator.coder_state().unwrap().current_step_idx(), 2);
        assert!(coordinator.code_step().await.unwrap().is_done());
        assert_eq!(coordinator.stage(), PipelineStage::Complete);

        // Terminal stage refuses further coder calls
        assert!(coordinator.code_step().await.is_err());
    }

    #[tokio::test]
    async fn test_finished_coordinator_refuses_second_run() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_tasks(&["a.js"]));
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend.clone());

        coordinator.run("first").await.unwrap();
        let events = coordinator.events().len();

        let err = coordinator.run("second").await.unwrap_err();
        assert!(err.to_string().contains("already finished"));
        assert_eq!(coordinator.events().len(), events);
        assert_eq!(backend.plan_inputs().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_plan_aborts_before_architect() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend {
            plan: None,
            ..Default::default()
        });
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend.clone());

        let err = coordinator.run("x").await.unwrap_err();
        assert!(format!("{err:#}").contains("planner did not return a response"));
        assert_eq!(coordinator.stage(), PipelineStage::Failed);
        assert!(backend.task_plan_inputs().is_empty());
        assert!(!dir.path().join("generated_project").exists());

        let kinds: Vec<_> = coordinator.events().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&PipelineEventKind::AgentFailed));
        assert_eq!(kinds.last(), Some(&PipelineEventKind::PipelineFailed));
    }

    #[tokio::test]
    async fn test_empty_task_plan_completes_without_coding() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::with_tasks(&[]));
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend.clone());

        let result = coordinator.run("nothing to do").await.unwrap();
        assert_eq!(result.steps_completed, 0);
        assert!(backend.code_inputs().is_empty());
    }

    #[tokio::test]
    async fn test_events_are_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::channel(64);
        let backend = Arc::new(ScriptedBackend::with_tasks(&["a.js"]));
        let mut coordinator = Coordinator::with_backend(&config(&dir), backend).with_event_channel(tx);

        coordinator.run("one file").await.unwrap();
        drop(coordinator);

        let mut streamed = Vec::new();
        while let Some(event) = rx.recv().await {
            streamed.push(event.kind);
        }
        assert_eq!(streamed.first(), Some(&PipelineEventKind::PipelineStarted));
        assert_eq!(streamed.last(), Some(&PipelineEventKind::PipelineCompleted));
    }
}
