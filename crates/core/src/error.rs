//! # Errors
//!
//! Typed failures for the project tools and the pipeline stages.
//! Stage and coordinator APIs still return `anyhow::Result`; these enums are
//! what ends up inside them when the failure is one of ours.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a project tool call
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested path resolves outside the project root
    #[error("Attempt to access '{path}' outside project root {root:?}")]
    PathEscape { path: String, root: PathBuf },

    /// Underlying filesystem or process error
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tool arguments could not be interpreted
    #[error("Invalid tool arguments: {0}")]
    InvalidArgs(String),
}

impl ToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A structured model call came back empty
    #[error("{stage} did not return a response")]
    MissingResponse { stage: &'static str },

    #[error(transparent)]
    Tool(#[from] ToolError),
}
