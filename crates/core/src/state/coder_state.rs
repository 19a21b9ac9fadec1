//! # Coder State
//!
//! Progress cursor over a [`TaskPlan`]. Owned by the coordinator for one run.

use super::plan::{ImplementationTask, TaskPlan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoderState {
    pub task_plan: TaskPlan,
    /// Index of the next step to implement; never decreases
    current_step_idx: usize,
    /// Content of the file being edited, as read before the current step
    #[serde(default)]
    pub current_file_content: Option<String>,
}

impl CoderState {
    pub fn new(task_plan: TaskPlan) -> Self {
        Self {
            task_plan,
            current_step_idx: 0,
            current_file_content: None,
        }
    }

    pub fn current_step_idx(&self) -> usize {
        self.current_step_idx
    }

    pub fn total_steps(&self) -> usize {
        self.task_plan.implementation_steps.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_step_idx >= self.total_steps()
    }

    pub fn current_task(&self) -> Option<&ImplementationTask> {
        self.task_plan
            .implementation_steps
            .get(self.current_step_idx)
    }

    /// Move to the next step. Saturates at the number of steps.
    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.current_step_idx += 1;
        }
        self.current_file_content = None;
    }

    /// Completed share of the plan, 0..=100
    pub fn percent_complete(&self) -> u8 {
        let total = self.total_steps();
        if total == 0 {
            return 100;
        }
        ((self.current_step_idx.min(total) * 100) / total) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(path: &str) -> ImplementationTask {
        ImplementationTask {
            filepath: path.to_string(),
            task_description: format!("implement {path}"),
        }
    }

    #[test]
    fn test_cursor_walks_every_step_once() {
        let mut state = CoderState::new(TaskPlan::new(vec![task("a.js"), task("b.js")]));
        assert_eq!(state.current_task().map(|t| t.filepath.as_str()), Some("a.js"));

        state.advance();
        assert_eq!(state.current_step_idx(), 1);
        assert_eq!(state.current_task().map(|t| t.filepath.as_str()), Some("b.js"));
        assert_eq!(state.percent_complete(), 50);

        state.advance();
        assert!(state.is_complete());
        assert!(state.current_task().is_none());
    }

    #[test]
    fn test_advance_saturates() {
        let mut state = CoderState::new(TaskPlan::new(vec![task("a.js")]));
        state.advance();
        state.advance();
        assert_eq!(state.current_step_idx(), 1);
        assert_eq!(state.percent_complete(), 100);
    }

    #[test]
    fn test_empty_plan_is_complete() {
        let state = CoderState::new(TaskPlan::new(vec![]));
        assert!(state.is_complete());
        assert_eq!(state.percent_complete(), 100);
    }
}
