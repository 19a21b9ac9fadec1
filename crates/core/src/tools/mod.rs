//! # Project Tools
//!
//! Everything a coder session may touch, confined to one project root.
//!
//! ## Modules
//!
//! - `path_guard` - Lexical containment check for tool paths
//! - `project_tools` - read/write/list/tree/cwd/exec over the root
//! - `command` - Shell command runner with timeout and structured output

pub mod command;
pub mod path_guard;
pub mod project_tools;

pub use command::{CommandOutput, CommandSpec, DEFAULT_COMMAND_TIMEOUT};
pub use path_guard::PathGuard;
pub use project_tools::ProjectTools;
