mod validate;

pub use validate::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::models::*;

/// Version stamped into documents written without an explicit parser version.
pub const PARSER_VERSION: &str = "1.0.0";

/// Write a work-item document to `path`.
///
/// `generated_at` is always set to the current time. Parent directories are
/// created as needed and any existing file is replaced.
pub fn save(
    path: &Path,
    epics: Vec<Epic>,
    source_document: impl Into<String>,
    parser_version: Option<String>,
) -> Result<Document, ToolError> {
    let document = Document {
        epics,
        metadata: DocumentMetadata {
            generated_at: Utc::now(),
            source_document: source_document.into(),
            parser_version: parser_version.unwrap_or_else(|| PARSER_VERSION.to_string()),
        },
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json).map_err(|e| ToolError::io(path, e))?;

    tracing::info!(
        "Saved {} epics to {}",
        document.epics.len(),
        path.display()
    );

    Ok(document)
}

/// Read a work-item document back from `path`.
pub fn load(path: &Path) -> Result<Document, ToolError> {
    let raw = fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| ToolError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Counts across the work-item hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemSummary {
    pub epics: usize,
    pub user_stories: usize,
    pub tasks: usize,
    /// Task count per status, keyed by the status string. Every status is present.
    pub tasks_by_status: BTreeMap<String, usize>,
}

pub fn summarize(document: &Document) -> WorkItemSummary {
    let mut tasks_by_status: BTreeMap<String, usize> = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();

    for task in document.tasks() {
        *tasks_by_status
            .entry(task.status.as_str().to_string())
            .or_default() += 1;
    }

    WorkItemSummary {
        epics: document.epics.len(),
        user_stories: document.user_stories().count(),
        tasks: document.tasks().count(),
        tasks_by_status,
    }
}
