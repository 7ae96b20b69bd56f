//! MCP tool servers.
//!
//! Each server is an independent stdio process with its own flat tool table:
//! - [`FilesystemServer`]: read_file, write_file, list_directory, search_files, cache_stats, clear_cache
//! - [`WorkItemsServer`]: save_work_items, load_work_items, validate_work_items, summarize_work_items
//! - [`CodegenServer`]: generate_stub, generate_controllers

mod codegen;
mod filesystem;
mod types;
mod work_items;

pub use codegen::CodegenServer;
pub use filesystem::FilesystemServer;
pub use types::*;
pub use work_items::WorkItemsServer;

use rmcp::{model::ServerInfo, ServerHandler, ServiceExt};

fn server_info(name: &str, instructions: &str) -> ServerInfo {
    ServerInfo {
        server_info: rmcp::model::Implementation {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: None,
            icons: None,
            website_url: None,
        },
        capabilities: rmcp::model::ServerCapabilities::builder()
            .enable_tools()
            .build(),
        instructions: Some(instructions.into()),
        ..Default::default()
    }
}

/// Serve `service` over stdin/stdout until the client disconnects.
pub async fn run_stdio_server<S: ServerHandler>(service: S) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    let name = service.get_info().server_info.name;
    tracing::info!("Starting {} MCP server via stdio", name);

    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("{} MCP server stopped: {:?}", name, quit_reason);

    Ok(())
}
