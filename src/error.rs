//! Tool-level errors and the uniform failure envelope.

use std::path::{Path, PathBuf};

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by tool operations.
///
/// These never cross the tool boundary as protocol errors. Each tool turns
/// them into an [`ErrorEnvelope`] inside an error result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Path is outside the workspace root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("File {} is {size} bytes, limit is {limit}", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ToolError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Short machine-friendly context for the envelope's `details` field.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Io { source, .. } => Some(format!("{:?}", source.kind())),
            Self::Parse { source, .. } => {
                Some(format!("line {}, column {}", source.line(), source.column()))
            }
            Self::OutsideRoot(_) => Some("paths must resolve inside the configured root".into()),
            Self::FileTooLarge { .. } => Some("raise PCFW_MAX_FILE_SIZE to allow it".into()),
            Self::AlreadyExists(_) => Some("pass overwrite=true to replace it".into()),
            Self::InvalidPattern(_) | Self::Serialize(_) | Self::InvalidArgument(_) => None,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.to_string(),
            details: self.details(),
            success: false,
        }
    }

    /// Render as an MCP error result carrying the JSON envelope.
    pub fn into_call_result(self) -> CallToolResult {
        tracing::warn!("Tool failed: {}", self);
        let body = serde_json::to_string_pretty(&self.envelope())
            .unwrap_or_else(|_| format!(r#"{{"error":"{}","success":false}}"#, self));
        CallToolResult::error(vec![Content::text(body)])
    }
}

/// The JSON body returned by every failed tool call.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: Option<String>,
    pub success: bool,
}

/// Serialize a tool response, or turn the failure into an error result.
pub fn tool_result<T: Serialize>(result: Result<T, ToolError>) -> CallToolResult {
    let value = match result {
        Ok(value) => value,
        Err(e) => return e.into_call_result(),
    };

    match serde_json::to_string_pretty(&value) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => ToolError::from(e).into_call_result(),
    }
}
