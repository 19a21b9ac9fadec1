pub mod coder_state;
pub mod plan;

pub use coder_state::CoderState;
pub use plan::{ArchitectOutput, ImplementationTask, Plan, TaskPlan};
