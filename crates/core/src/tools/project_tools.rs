//! # Project Tools
//!
//! The capability handed to a coder session: read, write, list, tree, exec
//! and cwd, all scoped to one project root through [`PathGuard`].
//!
//! File operations are blocking `std::fs` calls. Missing files and
//! directories are reported as values (`""`, `"ERROR: ..."`) so a model can
//! react to them; only path escapes and real I/O failures are errors.

use crate::error::ToolError;
use crate::tools::command::{run_command, CommandOutput, CommandSpec, DEFAULT_COMMAND_TIMEOUT};
use crate::tools::path_guard::PathGuard;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Returned by `list_files` when the directory holds no files
pub const NO_FILES_FOUND: &str = "No files found.";

/// Returned by `print_tree` when the directory is empty
pub const EMPTY_TREE: &str = "<empty>";

#[derive(Debug, Clone)]
pub struct ProjectTools {
    guard: PathGuard,
    command_timeout: Duration,
}

impl ProjectTools {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            guard: PathGuard::new(root),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Default timeout for `run_cmd` calls that do not pass their own
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Create the project root if it does not exist yet.
    pub fn init_root(&self) -> Result<PathBuf, ToolError> {
        let root = self.guard.root();
        fs::create_dir_all(root).map_err(|e| ToolError::io(root, e))?;
        Ok(root.to_path_buf())
    }

    /// Overwrite `path` with `content`, creating parent directories.
    pub fn write_file(&self, path: &str, content: &str) -> Result<String, ToolError> {
        let full_path = self.guard.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
        }
        fs::write(&full_path, content).map_err(|e| ToolError::io(&full_path, e))?;
        tracing::debug!(path = %path, bytes = content.len(), "write_file");
        Ok(format!("WROTE:{}", full_path.display()))
    }

    /// Contents of `path`, or an empty string if it does not exist.
    pub fn read_file(&self, path: &str) -> Result<String, ToolError> {
        let full_path = self.guard.resolve(path)?;
        if !full_path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&full_path).map_err(|e| ToolError::io(&full_path, e))
    }

    pub fn get_current_directory(&self) -> String {
        self.guard.root().display().to_string()
    }

    /// Every file under `directory`, root-relative, one per line.
    pub fn list_files(&self, directory: &str) -> Result<String, ToolError> {
        let dir = self.guard.resolve(directory)?;
        if !dir.is_dir() {
            return Ok(format!("ERROR: {} is not a directory", dir.display()));
        }

        let mut files: Vec<String> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.guard.relative(entry.path()))
            .collect();
        files.sort();

        if files.is_empty() {
            Ok(NO_FILES_FOUND.to_string())
        } else {
            Ok(files.join("\n"))
        }
    }

    /// Indented listing of `path`, directories first, down to `depth` levels.
    pub fn print_tree(&self, path: &str, depth: usize) -> Result<String, ToolError> {
        let start = self.guard.resolve(path)?;
        if !start.exists() {
            return Ok(format!("ERROR: {} does not exist", start.display()));
        }
        if !start.is_dir() {
            return Ok(format!("ERROR: {} is not a directory", start.display()));
        }

        let mut lines = Vec::new();
        walk_tree(&start, "", 0, depth, &mut lines);

        if lines.is_empty() {
            Ok(EMPTY_TREE.to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }

    /// Run a shell command in `cwd` (or the root) with `timeout`
    /// (or the configured default).
    pub async fn run_cmd(
        &self,
        cmd: &CommandSpec,
        cwd: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ToolError> {
        let dir = match cwd {
            Some(c) if !c.is_empty() => self.guard.resolve(c)?,
            _ => self.guard.root().to_path_buf(),
        };
        run_command(cmd, &dir, timeout.unwrap_or(self.command_timeout)).await
    }
}

fn walk_tree(dir: &Path, prefix: &str, level: usize, depth: usize, lines: &mut Vec<String>) {
    if level > depth {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            lines.push(format!("{prefix}[permission denied]"));
            return;
        }
        Err(e) => {
            lines.push(format!("{prefix}[unreadable: {e}]"));
            return;
        }
    };

    let mut entries: Vec<(bool, String, PathBuf)> = entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            (
                path.is_dir(),
                entry.file_name().to_string_lossy().to_string(),
                path,
            )
        })
        .collect();
    // Directories first, then by name
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    for (is_dir, name, path) in entries {
        let marker = if is_dir { "/" } else { "" };
        lines.push(format!("{prefix}{name}{marker}"));
        if is_dir {
            walk_tree(&path, &format!("{prefix}  "), level + 1, depth, lines);
        }
    }
}
