//! # File Tools
//!
//! The six radkit tools a coder session may call. Each closure captures a
//! clone of [`ProjectTools`], so path containment and the command timeout
//! come from the project the session was started for.
//!
//! Arguments are typed structs; their JSON schema is what the model sees.
//! Failures, including missing or malformed arguments, are returned as
//! `ToolResult::error` and stay inside the session.

use crate::error::ToolError;
use crate::tools::{CommandSpec, ProjectTools};
use radkit::tools::{FunctionTool, ToolResult};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Default depth for `print_tree`
pub const DEFAULT_TREE_DEPTH: usize = 2;

/// Names of the tools, in registration order
pub const TOOL_NAMES: [&str; 6] = [
    "read_file",
    "write_file",
    "list_files",
    "get_current_directory",
    "run_cmd",
    "print_tree",
];

/// Arguments for reading a file
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileArgs {
    /// Path relative to the project root
    pub path: String,
}

/// Arguments for writing a file
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileArgs {
    /// Path relative to the project root
    pub path: String,
    /// Full new content of the file
    pub content: String,
}

fn current_dir() -> String {
    ".".to_string()
}

fn default_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

/// Arguments for listing files
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFilesArgs {
    /// Directory relative to the project root
    #[serde(default = "current_dir")]
    pub directory: String,
}

/// Arguments for printing a directory tree
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrintTreeArgs {
    /// Directory relative to the project root
    #[serde(default = "current_dir")]
    pub path: String,
    /// Levels to descend
    #[serde(default = "default_depth")]
    pub depth: usize,
}

/// Arguments for running a command
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunCmdArgs {
    /// Shell line (`"ls -R"`) or list of words (`["ls", "-R"]`)
    pub cmd: CommandSpec,
    /// Working directory relative to the project root
    #[serde(default)]
    pub cwd: Option<String>,
    /// Timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// No arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

fn parameters<T: JsonSchema>() -> Value {
    schema_for!(T).to_value()
}

fn parse_args<T: DeserializeOwned>(
    tool: &str,
    args: HashMap<String, Value>,
) -> Result<T, ToolResult> {
    let object: Map<String, Value> = args.into_iter().collect();
    serde_json::from_value(Value::Object(object)).map_err(|e| {
        let err = ToolError::InvalidArgs(format!("{tool}: {e}"));
        tracing::warn!(tool, error = %err);
        ToolResult::error(err.to_string())
    })
}

fn failed(tool: &str, err: ToolError) -> ToolResult {
    tracing::warn!(tool, error = %err);
    ToolResult::error(err.to_string())
}

/// The coder tool set
pub struct CoderTools {
    pub read_file: FunctionTool,
    pub write_file: FunctionTool,
    pub list_files: FunctionTool,
    pub get_current_directory: FunctionTool,
    pub run_cmd: FunctionTool,
    pub print_tree: FunctionTool,
}

/// Create all coder tools over `project`
pub fn create_coder_tools(project: &ProjectTools) -> CoderTools {
    let p_read = project.clone();
    let p_write = project.clone();
    let p_list = project.clone();
    let p_cwd = project.clone();
    let p_cmd = project.clone();
    let p_tree = project.clone();

    let read_file = FunctionTool::new(
        "read_file",
        "Read a file from the project. Returns an empty string if it does not exist.",
        move |args, _ctx| {
            let project = p_read.clone();
            Box::pin(async move {
                let args: ReadFileArgs = match parse_args("read_file", args) {
                    Ok(args) => args,
                    Err(result) => return result,
                };
                match project.read_file(&args.path) {
                    Ok(content) => ToolResult::success(json!({
                        "path": args.path,
                        "content": content
                    })),
                    Err(e) => failed("read_file", e),
                }
            })
        },
    )
    .with_parameters_schema(parameters::<ReadFileArgs>());

    let write_file = FunctionTool::new(
        "write_file",
        "Write the full content of a file, creating parent directories.",
        move |args, _ctx| {
            let project = p_write.clone();
            Box::pin(async move {
                let args: WriteFileArgs = match parse_args("write_file", args) {
                    Ok(args) => args,
                    Err(result) => return result,
                };
                match project.write_file(&args.path, &args.content) {
                    Ok(confirmation) => ToolResult::success(json!(confirmation)),
                    Err(e) => failed("write_file", e),
                }
            })
        },
    )
    .with_parameters_schema(parameters::<WriteFileArgs>());

    let list_files = FunctionTool::new(
        "list_files",
        "List every file under a directory, relative to the project root.",
        move |args, _ctx| {
            let project = p_list.clone();
            Box::pin(async move {
                let args: ListFilesArgs = match parse_args("list_files", args) {
                    Ok(args) => args,
                    Err(result) => return result,
                };
                match project.list_files(&args.directory) {
                    Ok(listing) => ToolResult::success(json!(listing)),
                    Err(e) => failed("list_files", e),
                }
            })
        },
    )
    .with_parameters_schema(parameters::<ListFilesArgs>());

    let get_current_directory = FunctionTool::new(
        "get_current_directory",
        "Return the project root directory.",
        move |_args, _ctx| {
            let project = p_cwd.clone();
            Box::pin(async move { ToolResult::success(json!(project.get_current_directory())) })
        },
    )
    .with_parameters_schema(parameters::<NoArgs>());

    let run_cmd = FunctionTool::new(
        "run_cmd",
        "Run a shell command in the project. Returns exit_code, stdout, stderr and timed_out.",
        move |args, _ctx| {
            let project = p_cmd.clone();
            Box::pin(async move {
                let args: RunCmdArgs = match parse_args("run_cmd", args) {
                    Ok(args) => args,
                    Err(result) => return result,
                };
                let timeout = args.timeout.map(Duration::from_secs);

                match project.run_cmd(&args.cmd, args.cwd.as_deref(), timeout).await {
                    Ok(out) => ToolResult::success(json!({
                        "exit_code": out.exit_code,
                        "stdout": out.stdout,
                        "stderr": out.stderr,
                        "timed_out": out.timed_out
                    })),
                    Err(e) => failed("run_cmd", e),
                }
            })
        },
    )
    .with_parameters_schema(parameters::<RunCmdArgs>());

    let print_tree = FunctionTool::new(
        "print_tree",
        "Show a directory tree of the project, directories first.",
        move |args, _ctx| {
            let project = p_tree.clone();
            Box::pin(async move {
                let args: PrintTreeArgs = match parse_args("print_tree", args) {
                    Ok(args) => args,
                    Err(result) => return result,
                };
                match project.print_tree(&args.path, args.depth) {
                    Ok(tree) => ToolResult::success(json!(tree)),
                    Err(e) => failed("print_tree", e),
                }
            })
        },
    )
    .with_parameters_schema(parameters::<PrintTreeArgs>());

    CoderTools {
        read_file,
        write_file,
        list_files,
        get_current_directory,
        run_cmd,
        print_tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radkit::tools::{BaseTool, DefaultExecutionState, ToolContext};

    fn args(value: Value) -> HashMap<String, Value> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }

    async fn call(tool: &FunctionTool, value: Value) -> ToolResult {
        let state = DefaultExecutionState::new();
        let ctx = ToolContext::builder().with_state(&state).build().unwrap();
        tool.run_async(args(value), &ctx).await
    }

    fn project() -> (tempfile::TempDir, ProjectTools) {
        let dir = tempfile::tempdir().unwrap();
        let tools = ProjectTools::new(dir.path());
        (dir, tools)
    }

    #[test]
    fn test_tools_declare_argument_schemas() {
        let (_dir, project) = project();
        let tools = create_coder_tools(&project);

        let write = tools.write_file.declaration();
        let required = write.parameters()["required"].as_array().unwrap();
        assert!(required.contains(&json!("path")));
        assert!(required.contains(&json!("content")));

        let cmd = tools.run_cmd.declaration();
        assert!(cmd.parameters()["properties"].get("cmd").is_some());
        assert_eq!(cmd.parameters()["required"], json!(["cmd"]));

        let names: Vec<String> = [
            &tools.read_file,
            &tools.write_file,
            &tools.list_files,
            &tools.get_current_directory,
            &tools.run_cmd,
            &tools.print_tree,
        ]
        .iter()
        .map(|t| t.name().to_string())
        .collect();
        assert_eq!(names, TOOL_NAMES);
    }

    #[tokio::test]
    async fn test_write_file_without_content_leaves_file_alone() {
        let (_dir, project) = project();
        project.write_file("app.js", "const important = 1;\n").unwrap();
        let tools = create_coder_tools(&project);

        let result = call(&tools.write_file, json!({ "path": "app.js" })).await;

        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("content"));
        assert_eq!(project.read_file("app.js").unwrap(), "const important = 1;\n");
    }

    #[tokio::test]
    async fn test_write_then_read_through_tools() {
        let (_dir, project) = project();
        let tools = create_coder_tools(&project);

        let written = call(&tools.write_file, json!({ "path": "src/a.js", "content": "x" })).await;
        assert!(written.is_success());

        let read = call(&tools.read_file, json!({ "path": "src/a.js" })).await;
        assert_eq!(read.data()["content"], "x");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_cmd_list_form() {
        let (_dir, project) = project();
        let tools = create_coder_tools(&project);

        let result = call(&tools.run_cmd, json!({ "cmd": ["echo", "hi"] })).await;

        assert!(result.is_success());
        assert_eq!(result.data()["exit_code"], 0);
        assert!(result.data()["stdout"].as_str().unwrap().contains("hi"));
    }

    #[tokio::test]
    async fn test_run_cmd_without_cmd_is_error() {
        let (_dir, project) = project();
        let tools = create_coder_tools(&project);

        let result = call(&tools.run_cmd, json!({ "cwd": "." })).await;
        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("cmd"));
    }

    #[tokio::test]
    async fn test_listing_defaults() {
        let (_dir, project) = project();
        project.write_file("index.html", "<p></p>").unwrap();
        project.write_file("js/app.js", "").unwrap();
        let tools = create_coder_tools(&project);

        let listing = call(&tools.list_files, json!({})).await;
        assert_eq!(listing.data(), &json!("index.html\njs/app.js"));

        let tree = call(&tools.print_tree, json!({})).await;
        assert_eq!(tree.data(), &json!("js/\n  app.js\nindex.html"));
    }

    #[tokio::test]
    async fn test_escaping_path_is_error_result() {
        let (_dir, project) = project();
        let tools = create_coder_tools(&project);

        let result = call(&tools.write_file, json!({ "path": "../out.txt", "content": "x" })).await;
        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("outside project root"));

        let result = call(&tools.read_file, json!({ "path": "/etc/passwd" })).await;
        assert!(result.is_error());
    }
}
