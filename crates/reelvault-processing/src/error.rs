//! Media tool error types.
//!
//! `ToolError` distinguishes "the tool could not be launched" from "the tool
//! ran and failed" from "the tool ran but produced nothing usable". All
//! variants are fatal to an upload; the detail (including captured stderr) is
//! for operator logs, never for clients.

use std::path::PathBuf;
use std::process::ExitStatus;

use reelvault_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds}s")]
    TimedOut { tool: &'static str, seconds: u64 },

    #[error("unparseable stream metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no video stream with pixel dimensions found")]
    NoVideoStream,

    #[error("remuxed output {} is empty", .path.display())]
    EmptyOutput { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        AppError::ToolFailure(err.to_string())
    }
}
