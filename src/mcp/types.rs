//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{DocumentMetadata, Epic};
use crate::work_items::{ValidationReport, WorkItemSummary};

// ============================================================
// Filesystem Requests
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileRequest {
    #[schemars(description = "Path of the file to read, relative to the workspace root")]
    pub path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileRequest {
    #[schemars(description = "Path of the file to write, relative to the workspace root")]
    pub path: String,
    #[schemars(description = "Full text content of the file")]
    pub content: String,
    #[schemars(description = "Create missing parent directories. Defaults to true.")]
    #[serde(default = "default_true")]
    pub create_dirs: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDirectoryRequest {
    #[schemars(description = "Directory to list, relative to the workspace root. Defaults to the root.")]
    #[serde(default = "default_root")]
    pub path: String,
    #[schemars(
        description = "How many levels of subdirectories to descend into. 0 lists only the directory's own entries."
    )]
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[schemars(description = "Include dot-files and dot-directories")]
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchFilesRequest {
    #[schemars(description = "Directory (or single file) to search, relative to the workspace root")]
    #[serde(default = "default_root")]
    pub path: String,
    #[schemars(description = "Text to look for; a regular expression when regex=true")]
    pub pattern: String,
    #[schemars(description = "Treat pattern as a regular expression instead of plain text")]
    #[serde(default)]
    pub regex: bool,
    #[schemars(description = "Match case exactly. Defaults to false.")]
    #[serde(default)]
    pub case_sensitive: bool,
    #[schemars(description = "How many levels of subdirectories to descend into")]
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[schemars(description = "Stop after this many matching lines")]
    #[serde(default)]
    pub max_results: Option<usize>,
    #[schemars(description = "Only search files with these extensions, e.g. [\"ts\", \"tsx\"]")]
    #[serde(default)]
    pub extensions: Vec<String>,
    #[schemars(description = "Search dot-files and dot-directories too")]
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

// ============================================================
// Work Item Requests
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveWorkItemsRequest {
    #[schemars(description = "Where to write the work-item JSON, relative to the workspace root")]
    pub path: String,
    #[schemars(description = "The epic hierarchy: epics contain user_stories, which contain tasks")]
    pub epics: Vec<Epic>,
    #[schemars(description = "Path of the requirements document the epics were extracted from")]
    pub source_document: String,
    #[schemars(description = "Version of the parser that produced the epics, if known")]
    #[serde(default)]
    pub parser_version: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WorkItemsPathRequest {
    #[schemars(description = "Path of a work-item JSON file, relative to the workspace root")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveWorkItemsResponse {
    pub path: String,
    pub metadata: DocumentMetadata,
    /// Validation of what was written. Saving does not require a valid document.
    pub validation: ValidationReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub path: String,
    pub source_document: String,
    pub summary: WorkItemSummary,
}

// ============================================================
// Codegen Requests
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateStubRequest {
    #[schemars(description = "An existing generated file to use as the template")]
    pub template_path: String,
    #[schemars(description = "The identifier used throughout the template, e.g. 'Product'")]
    pub source_name: String,
    #[schemars(description = "The identifier to substitute, e.g. 'Order'")]
    pub target_name: String,
    #[schemars(description = "Where to write the new file")]
    pub output_path: String,
    #[schemars(description = "Replace the output file if it exists")]
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateControllersRequest {
    #[schemars(description = "Work-item JSON file; one stub is generated per user story")]
    pub work_items_path: String,
    #[schemars(description = "An existing controller file to use as the template")]
    pub template_path: String,
    #[schemars(description = "The identifier used throughout the template, e.g. 'Product'")]
    pub source_name: String,
    #[schemars(description = "Directory to write the generated files into")]
    pub output_dir: String,
    #[schemars(description = "Replace output files that already exist instead of skipping them")]
    #[serde(default)]
    pub overwrite: bool,
}

fn default_true() -> bool {
    true
}

fn default_root() -> String {
    ".".to_string()
}
