//! # Pipeline Events
//!
//! Progress notifications emitted by the coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of pipeline event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    PipelineStarted,
    /// A stage began work
    AgentStarted,
    /// A stage finished successfully
    AgentCompleted,
    /// A stage returned an error
    AgentFailed,
    /// Coder picked up a task
    StepStarted,
    /// Coder finished a task
    StepCompleted,
    PipelineCompleted,
    PipelineFailed,
}

/// An event in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Position in the run, starting at 0
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: PipelineEventKind,
    /// Agent that produced this event
    pub agent: String,
    /// Progress of `agent`, 0..=100
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub message: Option<String>,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PipelineEvent {
    pub fn new(kind: PipelineEventKind, agent: &str) -> Self {
        Self {
            seq: 0,
            timestamp: Utc::now(),
            kind,
            agent: agent.to_string(),
            progress: None,
            message: None,
            data: None,
        }
    }

    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress = Some(percent.min(100));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = PipelineEvent::new(PipelineEventKind::StepStarted, "coder")
            .with_progress(140)
            .with_message("script.js");

        assert_eq!(event.agent, "coder");
        assert_eq!(event.progress, Some(100));
        assert_eq!(event.message.as_deref(), Some("script.js"));
    }

    #[test]
    fn test_event_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PipelineEventKind::PipelineCompleted).unwrap();
        assert_eq!(json, "\"pipeline_completed\"");
    }
}
