//! # Command Runner
//!
//! Runs a shell command inside the project with a timeout and hands back
//! exit code, stdout and stderr. Timeouts and non-zero exits are part of the
//! returned [`CommandOutput`]; only a failure to spawn is an error.

use crate::error::ToolError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for `run_cmd`
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// A command as the model supplied it: one shell line or a list of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CommandSpec {
    /// `"ls -R"`
    Shell(String),
    /// `["bash", "-lc", "ls -R"]`
    Args(Vec<String>),
}

impl CommandSpec {
    /// The single shell line that gets executed. List forms are space-joined.
    pub fn to_shell_line(&self) -> String {
        match self {
            CommandSpec::Shell(s) => s.clone(),
            CommandSpec::Args(args) => args.join(" "),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(s: &str) -> Self {
        CommandSpec::Shell(s.to_string())
    }
}

impl From<Vec<&str>> for CommandSpec {
    fn from(args: Vec<&str>) -> Self {
        CommandSpec::Args(args.into_iter().map(String::from).collect())
    }
}

/// Result of a finished (or timed out) command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Process exit code; -1 when killed by a signal or by the timeout
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    #[serde(default)]
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Run `spec` through the platform shell in `cwd`.
pub async fn run_command(
    spec: &CommandSpec,
    cwd: &Path,
    timeout: Duration,
) -> Result<CommandOutput, ToolError> {
    let line = spec.to_shell_line();
    let mut cmd = shell_command(&line);
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = %line, cwd = ?cwd, "run_cmd");

    let child = cmd.spawn().map_err(|e| ToolError::io(cwd, e))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            timed_out: false,
        }),
        Ok(Err(e)) => Err(ToolError::io(cwd, e)),
        Err(_) => {
            tracing::warn!(command = %line, ?timeout, "run_cmd timed out");
            Ok(CommandOutput {
                exit_code: -1,
                stdout: String::new(),
                stderr: format!("Command timed out after {}s", timeout.as_secs()),
                timed_out: true,
            })
        }
    }
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}
