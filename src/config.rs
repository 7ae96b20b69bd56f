//! Runtime configuration.
//!
//! Values come from environment variables and can be overridden by CLI flags:
//! - `PCFW_ROOT` - Workspace root all tool paths resolve against (default: current directory)
//! - `PCFW_CACHE_CAPACITY` - Maximum number of cached file contents (default: 100)
//! - `PCFW_MAX_FILE_SIZE` - Largest file, in bytes, that tools will read (default: 10 MiB)
//! - `PCFW_MAX_RESULTS` - Default cap on search matches (default: 100)
//! - `PCFW_MAX_DEPTH` - Default traversal depth for listings and searches (default: 5)

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_RESULTS: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub root: PathBuf,
    pub cache_capacity: usize,
    pub max_file_size: u64,
    pub max_results: usize,
    pub max_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let root = std::env::var("PCFW_ROOT")
            .map(PathBuf::from)
            .or_else(|_| std::env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            root,
            cache_capacity: env_or("PCFW_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            max_file_size: env_or("PCFW_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
            max_results: env_or("PCFW_MAX_RESULTS", DEFAULT_MAX_RESULTS),
            max_depth: env_or("PCFW_MAX_DEPTH", DEFAULT_MAX_DEPTH),
        }
    }

    /// Defaults rooted at `root`, ignoring the environment. Used by tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
