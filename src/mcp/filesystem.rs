//! Filesystem server: sandboxed reads and writes, listings and content search.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use super::server_info;
use super::types::*;
use crate::error::tool_result;
use crate::files::{FileManager, SearchOptions};

#[derive(Clone)]
pub struct FilesystemServer {
    files: FileManager,
    tool_router: ToolRouter<Self>,
}

impl FilesystemServer {
    pub fn new(files: FileManager) -> Self {
        Self {
            files,
            tool_router: Self::tool_router(),
        }
    }

    pub fn files(&self) -> &FileManager {
        &self.files
    }
}

#[tool_router]
impl FilesystemServer {
    #[tool(
        description = "Read a text file inside the workspace. Returns path, content, size in bytes, and whether the content came from the cache. Files over the configured size limit are rejected."
    )]
    pub async fn read_file(
        &self,
        params: Parameters<ReadFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.files.read_file(&params.0.path)))
    }

    #[tool(
        description = "Write a text file inside the workspace, replacing any existing content. Missing parent directories are created unless create_dirs=false."
    )]
    pub async fn write_file(
        &self,
        params: Parameters<WriteFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(tool_result(
            self.files.write_file(&req.path, &req.content, req.create_dirs),
        ))
    }

    #[tool(
        description = "List files and directories recursively. Each entry has path (relative to the workspace root), kind (file/directory), size and depth. Build output and VCS directories (.git, node_modules, target, bin, obj) are listed but not descended into."
    )]
    pub async fn list_directory(
        &self,
        params: Parameters<ListDirectoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(tool_result(self.files.list_directory(
            &req.path,
            req.max_depth,
            req.include_hidden,
        )))
    }

    #[tool(
        description = "Search file contents line by line for plain text or a regular expression. Returns matching lines with path and 1-based line number. Binary and oversized files are skipped. truncated=true means more matches exist beyond max_results."
    )]
    pub async fn search_files(
        &self,
        params: Parameters<SearchFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let options = SearchOptions {
            regex: req.regex,
            case_sensitive: req.case_sensitive,
            max_depth: req.max_depth,
            max_results: req.max_results,
            extensions: req.extensions,
            include_hidden: req.include_hidden,
        };
        Ok(tool_result(
            self.files.search_files(&req.path, &req.pattern, &options),
        ))
    }

    #[tool(description = "Report file cache usage: entries, capacity, hits, misses, evictions.")]
    pub async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        Ok(tool_result(Ok(self.files.cache_stats())))
    }

    #[tool(description = "Drop all cached file contents. Returns how many entries were cleared.")]
    pub async fn clear_cache(&self) -> Result<CallToolResult, McpError> {
        let cleared = self.files.clear_cache();
        tracing::info!("Cleared {} cached files", cleared);
        Ok(tool_result(Ok(ClearCacheResponse { cleared })))
    }
}

#[tool_handler]
impl ServerHandler for FilesystemServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "pcfw-filesystem",
            r#"Sandboxed file access for a PCF workspace.

All paths are relative to the workspace root; paths that escape it are rejected.

- read_file / write_file: text content, reads are cached until the file changes
- list_directory: recursive listing bounded by max_depth
- search_files: plain-text or regex search bounded by max_depth and max_results
- cache_stats / clear_cache: inspect or reset the content cache

Failures return {"error", "details", "success": false} with isError=true."#,
        )
    }
}
