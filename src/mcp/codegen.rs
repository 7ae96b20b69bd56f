//! Codegen server: stub files from an example file by identifier substitution.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use super::server_info;
use super::types::*;
use crate::codegen;
use crate::error::tool_result;
use crate::files::FileManager;

#[derive(Clone)]
pub struct CodegenServer {
    files: FileManager,
    tool_router: ToolRouter<Self>,
}

impl CodegenServer {
    pub fn new(files: FileManager) -> Self {
        Self {
            files,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl CodegenServer {
    #[tool(
        description = "Create a new source file from an existing one by renaming an identifier. Every casing of source_name (PascalCase, camelCase, snake_case, kebab-case, UPPER_SNAKE) is replaced with the same casing of target_name. Purely textual: review the output."
    )]
    pub async fn generate_stub(
        &self,
        params: Parameters<GenerateStubRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(tool_result(codegen::generate_stub(
            &self.files,
            &req.template_path,
            &req.source_name,
            &req.target_name,
            &req.output_path,
            req.overwrite,
        )))
    }

    #[tool(
        description = "Generate one controller stub per user story in a work-item file. Each story title becomes a PascalCase type name substituted for source_name in the template. Existing files are skipped unless overwrite=true. Returns generated and skipped files."
    )]
    pub async fn generate_controllers(
        &self,
        params: Parameters<GenerateControllersRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(tool_result(codegen::generate_controllers(
            &self.files,
            &req.work_items_path,
            &req.template_path,
            &req.source_name,
            &req.output_dir,
            req.overwrite,
        )))
    }
}

#[tool_handler]
impl ServerHandler for CodegenServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "pcfw-codegen",
            r#"Generates source stubs by copying an example file and renaming its main identifier.

This is text substitution, not code generation: the result compiles only if the
template does, and identifiers that merely contain the source name may change too.

- generate_stub: one file, explicit target name
- generate_controllers: one file per user story of a work-item JSON file"#,
        )
    }
}
