//! Prompt templates bundled at compile time, and the functions that fill in
//! the per-call user messages.

use crate::state::ImplementationTask;

/// Planner - turns a user request into a Plan
pub const PLANNER: &str = include_str!("defaults/planner.md");

/// Architect - turns a Plan into ordered file-level tasks
pub const ARCHITECT: &str = include_str!("defaults/architect.md");

/// Coder - implements one task with the project tools
pub const CODER: &str = include_str!("defaults/coder.md");

pub fn planner_prompt(user_prompt: &str) -> String {
    format!("User request:\n{}\n", user_prompt.trim())
}

pub fn architect_prompt(plan_json: &str) -> String {
    format!("Project Plan:\n{}\n", plan_json)
}

pub fn coder_prompt(task: &ImplementationTask, existing_content: &str) -> String {
    format!(
        "Task: {}\n\
         File: {}\n\
         Existing content:\n{}\n\
         When saving changes, call the tool `write_file(path, content)`.\n\
         Only use these tools: read_file, write_file, list_files, print_tree, \
         get_current_directory, run_cmd.\n\
         Do NOT call any other tools.",
        task.task_description, task.filepath, existing_content
    )
}
