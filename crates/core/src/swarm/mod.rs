//! # Swarm Orchestration
//!
//! Coordinates the agent pipeline.
//!
//! ## Pipeline Flow
//!
//! ```text
//! User Request → Planner → Architect → Coder ⟲ (one task per call) → Complete
//! ```

pub mod coordinator;
pub mod events;
pub mod pipeline;

pub use coordinator::{Coordinator, PipelineResult};
pub use events::{PipelineEvent, PipelineEventKind};
pub use pipeline::{Pipeline, PipelineStage};
