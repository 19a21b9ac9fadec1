//! # Pipeline Stages
//!
//! Planner → Architect → Coder (self-loop) → Complete.

use serde::{Deserialize, Serialize};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Turning the user request into a plan
    Planning,
    /// Breaking the plan into file tasks
    Architecting,
    /// Implementing tasks, one per coder invocation
    Coding,
    Complete,
    Failed,
}

impl PipelineStage {
    /// Agent name used in events and logs
    pub fn agent(&self) -> &'static str {
        match self {
            PipelineStage::Planning => "planner",
            PipelineStage::Architecting => "architect",
            PipelineStage::Coding => "coder",
            PipelineStage::Complete | PipelineStage::Failed => "coordinator",
        }
    }
}

/// The pipeline state machine
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub stage: PipelineStage,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            stage: PipelineStage::Planning,
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next stage
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            PipelineStage::Planning => PipelineStage::Architecting,
            PipelineStage::Architecting => PipelineStage::Coding,
            PipelineStage::Coding => PipelineStage::Complete,
            PipelineStage::Complete => PipelineStage::Complete,
            PipelineStage::Failed => PipelineStage::Failed,
        };
    }

    /// Record one coder invocation. `done` ends the loop; otherwise the
    /// pipeline stays in `Coding`.
    pub fn coder_step(&mut self, done: bool) {
        if done && self.stage == PipelineStage::Coding {
            self.advance();
        }
    }

    pub fn fail(&mut self) {
        self.stage = PipelineStage::Failed;
    }

    /// Check if pipeline has stopped, successfully or not
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, PipelineStage::Complete | PipelineStage::Failed)
    }
}
