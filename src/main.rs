use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pcf_workbench::config::Config;
use pcf_workbench::files::FileManager;
use pcf_workbench::mcp;

#[derive(Parser)]
#[command(name = "pcfw")]
#[command(about = "MCP tool servers for PCF development workflows")]
struct Cli {
    /// Workspace root all tool paths resolve against (overrides PCFW_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Maximum number of cached file contents (overrides PCFW_CACHE_CAPACITY)
    #[arg(long, global = true)]
    cache_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve file read/write, listing and search tools via stdio
    Filesystem,
    /// Serve work-item save/load/validate tools via stdio
    WorkItems,
    /// Serve stub generation tools via stdio
    Codegen,
}

/// Initialize tracing on stderr, since stdout is the protocol channel
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pcf_workbench=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(capacity) = cli.cache_capacity {
        config.cache_capacity = capacity;
    }

    let files = FileManager::new(config)?;

    match cli.command {
        Commands::Filesystem => mcp::run_stdio_server(mcp::FilesystemServer::new(files)).await?,
        Commands::WorkItems => mcp::run_stdio_server(mcp::WorkItemsServer::new(files)).await?,
        Commands::Codegen => mcp::run_stdio_server(mcp::CodegenServer::new(files)).await?,
    }

    Ok(())
}
