//! Work-items server: persist, read back and check Epic > User Story > Task documents.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use super::server_info;
use super::types::*;
use crate::error::{tool_result, ToolError};
use crate::files::FileManager;
use crate::models::Document;
use crate::work_items::{self, ValidationReport};

#[derive(Clone)]
pub struct WorkItemsServer {
    files: FileManager,
    tool_router: ToolRouter<Self>,
}

impl WorkItemsServer {
    pub fn new(files: FileManager) -> Self {
        Self {
            files,
            tool_router: Self::tool_router(),
        }
    }

    fn save(&self, req: SaveWorkItemsRequest) -> Result<SaveWorkItemsResponse, ToolError> {
        let path = self.files.resolve(&req.path)?;
        let document = work_items::save(&path, req.epics, req.source_document, req.parser_version)?;
        Ok(SaveWorkItemsResponse {
            path: req.path,
            validation: work_items::validate(&document),
            metadata: document.metadata,
        })
    }

    fn load(&self, path: &str) -> Result<Document, ToolError> {
        work_items::load(&self.files.resolve(path)?)
    }

    fn validate(&self, path: &str) -> Result<ValidationReport, ToolError> {
        Ok(work_items::validate_file(&self.files.resolve(path)?))
    }

    fn summarize(&self, path: &str) -> Result<SummaryResponse, ToolError> {
        let document = self.load(path)?;
        Ok(SummaryResponse {
            path: path.to_string(),
            summary: work_items::summarize(&document),
            source_document: document.metadata.source_document,
        })
    }
}

#[tool_router]
impl WorkItemsServer {
    #[tool(
        description = "Write an Epic > User Story > Task hierarchy to a JSON file. Ids must follow E<n>, US<n> and T<n>; task status is todo, in-progress or done. generated_at is set automatically. Returns the metadata written and a validation report."
    )]
    pub async fn save_work_items(
        &self,
        params: Parameters<SaveWorkItemsRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.save(params.0)))
    }

    #[tool(description = "Read a work-item JSON file back, including its metadata.")]
    pub async fn load_work_items(
        &self,
        params: Parameters<WorkItemsPathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.load(&params.0.path)))
    }

    #[tool(
        description = "Check a work-item JSON file: id patterns, duplicate ids, dependency cycles (errors) and unknown dependencies or empty titles (warnings). Malformed files produce valid=false rather than a failure."
    )]
    pub async fn validate_work_items(
        &self,
        params: Parameters<WorkItemsPathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.validate(&params.0.path)))
    }

    #[tool(description = "Count epics, user stories and tasks (per status) in a work-item JSON file.")]
    pub async fn summarize_work_items(
        &self,
        params: Parameters<WorkItemsPathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.summarize(&params.0.path)))
    }
}

#[tool_handler]
impl ServerHandler for WorkItemsServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "pcfw-work-items",
            r#"Stores the Agile work-item hierarchy extracted from requirements documents.

Document shape:
  {"epics": [{"id": "E1", "title", "description", "acceptance_criteria": [],
     "user_stories": [{"id": "US1", "title", "description", "acceptance_criteria": [],
       "tasks": [{"id": "T1", "title", "purpose", "implementation_details",
                  "dependencies": ["T2"], "assignee", "status": "todo",
                  "estimated_effort"}]}]}],
   "metadata": {"generated_at", "source_document", "parser_version"}}

Every array field must be present, even when empty.

WORKFLOW:
1. save_work_items once the epics are extracted
2. validate_work_items before handing the file to code generation
3. load_work_items / summarize_work_items to read it back"#,
        )
    }
}
