//! # Blueprint Skills
//!
//! The three pipeline stages and the tools the last one works with.
//!
//! ## Architecture
//!
//! ```text
//! Coordinator
//!   └── Skills (PlannerSkill, ArchitectSkill, CoderSkill)
//!         └── AgentBackend (radkit LlmFunction / LlmWorker)
//!               └── Tools (FunctionTool over ProjectTools)
//! ```
//!
//! - `PlannerSkill` - User request to Plan
//! - `ArchitectSkill` - Plan to ordered TaskPlan
//! - `CoderSkill` - One task per call, via a tool-using session

pub mod backend;
mod llm_helpers;
pub mod prompts;
pub mod tools;

pub mod architect_skill;
pub mod coder_skill;
pub mod planner_skill;

#[cfg(test)]
pub(crate) mod testing;

pub use architect_skill::ArchitectSkill;
pub use backend::{AgentBackend, RadkitBackend};
pub use coder_skill::{CoderOutput, CoderSkill, CoderStep};
pub use planner_skill::PlannerSkill;
