//! # Blueprint Core
//!
//! Turns a one-line application request into files on disk through three
//! LLM agents run in sequence: planner, architect, coder.
//!
//! ## Architecture
//!
//! - `skills/` - The three stages and the model backend they call
//! - `models` - LLM provider configuration
//! - `state/` - Plan, task plan and coder cursor
//! - `swarm/` - Pipeline state machine, events, coordinator
//! - `tools/` - Sandboxed file and command operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blueprint_core::config::PipelineConfig;
//! use blueprint_core::swarm::Coordinator;
//!
//! let config = PipelineConfig::load(None)?;
//! let mut coordinator = Coordinator::new(&config);
//! let result = coordinator.run("Build a simple calculator web app").await?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod skills;
pub mod state;
pub mod swarm;
pub mod tools;
