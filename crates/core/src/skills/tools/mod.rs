//! # Radkit-Compatible Tools
//!
//! `FunctionTool` wrappers that expose project tools to a model session.

pub mod file_tools;

pub use file_tools::{create_coder_tools, CoderTools, TOOL_NAMES};
