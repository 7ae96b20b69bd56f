//! Sandboxed file access with a content cache.
//!
//! [`FileManager`] resolves every tool path against a workspace root and
//! refuses anything that escapes it. Reads go through a shared [`FileCache`].

mod cache;
mod walk;

pub use cache::*;
pub use walk::*;

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ToolError;

/// Upper bound on entries returned by a single listing.
pub const MAX_LIST_ENTRIES: usize = 1000;

/// Lines longer than this are shortened in search results.
const MAX_LINE_CHARS: usize = 500;

#[derive(Clone)]
pub struct FileManager {
    root: PathBuf,
    config: Config,
    cache: Arc<Mutex<FileCache>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub path: String,
    pub content: String,
    pub size: u64,
    /// Whether the content was served from the cache.
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFileResponse {
    pub path: String,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDirectoryResponse {
    pub path: String,
    pub entries: Vec<WalkEntry>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    pub path: String,
    /// 1-based.
    pub line_number: usize,
    pub line: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub pattern: String,
    pub matches: Vec<SearchMatch>,
    pub files_scanned: usize,
    /// More matches existed beyond `max_results`.
    pub truncated: bool,
}

/// Parameters for [`FileManager::search_files`]. `None` falls back to the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub regex: bool,
    pub case_sensitive: bool,
    pub max_depth: Option<usize>,
    pub max_results: Option<usize>,
    /// Only search files with these extensions (leading dots are ignored).
    pub extensions: Vec<String>,
    pub include_hidden: bool,
}

impl FileManager {
    /// Create a manager rooted at `config.root`, which must be an existing directory.
    pub fn new(config: Config) -> Result<Self, ToolError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ToolError::io(&config.root, e))?;
        if !root.is_dir() {
            return Err(ToolError::InvalidArgument(format!(
                "workspace root {} is not a directory",
                root.display()
            )));
        }

        tracing::info!(
            "File manager rooted at {} (cache capacity {})",
            root.display(),
            config.cache_capacity
        );

        Ok(Self {
            root,
            cache: Arc::new(Mutex::new(FileCache::new(config.cache_capacity))),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied path to an absolute path inside the root.
    ///
    /// Relative paths are taken from the root. `..` is applied lexically, then
    /// every existing component is checked: symlinks must resolve to a target
    /// inside the root, and dangling symlinks are rejected.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ToolError> {
        let outside = || ToolError::OutsideRoot(PathBuf::from(path));

        let joined = normalize(&self.root.join(path));
        let relative = joined.strip_prefix(&self.root).map_err(|_| outside())?;

        let mut resolved = self.root.clone();
        let mut components = relative.components();
        while let Some(component) = components.next() {
            let candidate = resolved.join(component);
            let metadata = match fs::symlink_metadata(&candidate) {
                Ok(m) => m,
                Err(_) => {
                    // Nothing below a missing component can be a link.
                    resolved = candidate.join(components.as_path());
                    break;
                }
            };

            if !metadata.file_type().is_symlink() {
                resolved = candidate;
                continue;
            }

            match candidate.canonicalize() {
                Ok(target) if target.starts_with(&self.root) => resolved = target,
                Ok(_) => return Err(outside()),
                Err(e) => {
                    tracing::warn!("Refusing dangling symlink {}", candidate.display());
                    return Err(ToolError::io(&candidate, e));
                }
            }
        }

        Ok(resolved)
    }

    fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }

    pub fn read_file(&self, path: &str) -> Result<ReadFileResponse, ToolError> {
        let resolved = self.resolve(path)?;
        let metadata = fs::metadata(&resolved).map_err(|e| ToolError::io(&resolved, e))?;
        if metadata.is_dir() {
            return Err(ToolError::InvalidArgument(format!(
                "{} is a directory",
                self.display_path(&resolved)
            )));
        }
        if metadata.len() > self.config.max_file_size {
            return Err(ToolError::FileTooLarge {
                path: resolved,
                size: metadata.len(),
                limit: self.config.max_file_size,
            });
        }

        let (content, cached) = self
            .read_cached(&resolved, &metadata)
            .map_err(|e| ToolError::io(&resolved, e))?;

        Ok(ReadFileResponse {
            path: self.display_path(&resolved),
            size: metadata.len(),
            content,
            cached,
        })
    }

    fn read_cached(
        &self,
        path: &Path,
        metadata: &fs::Metadata,
    ) -> std::io::Result<(String, bool)> {
        let modified = metadata.modified()?;

        {
            let mut cache = self.cache.lock().expect("file cache lock poisoned");
            if let Some(content) = cache.get(path, modified) {
                tracing::debug!("Cache hit for {}", path.display());
                return Ok((content.to_string(), true));
            }
        }

        let content = fs::read_to_string(path)?;
        self.cache
            .lock()
            .expect("file cache lock poisoned")
            .insert(path, modified, content.clone());
        Ok((content, false))
    }

    pub fn write_file(
        &self,
        path: &str,
        content: &str,
        create_dirs: bool,
    ) -> Result<WriteFileResponse, ToolError> {
        let resolved = self.resolve(path)?;
        if resolved.is_dir() {
            return Err(ToolError::InvalidArgument(format!(
                "{} is a directory",
                self.display_path(&resolved)
            )));
        }

        if create_dirs {
            if let Some(parent) = resolved.parent() {
                fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
            }
        }

        fs::write(&resolved, content).map_err(|e| ToolError::io(&resolved, e))?;
        self.cache
            .lock()
            .expect("file cache lock poisoned")
            .invalidate(&resolved);

        tracing::info!("Wrote {} bytes to {}", content.len(), resolved.display());

        Ok(WriteFileResponse {
            path: self.display_path(&resolved),
            bytes_written: content.len(),
        })
    }

    pub fn list_directory(
        &self,
        path: &str,
        max_depth: Option<usize>,
        include_hidden: bool,
    ) -> Result<ListDirectoryResponse, ToolError> {
        let resolved = self.resolve(path)?;
        let options = WalkOptions {
            max_depth: max_depth.unwrap_or(self.config.max_depth),
            include_hidden,
        };

        let mut entries = Vec::new();
        let mut truncated = false;
        walk(&self.root, &resolved, options, |_, entry| {
            if entries.len() == MAX_LIST_ENTRIES {
                truncated = true;
                return false;
            }
            entries.push(entry.clone());
            true
        })
        .map_err(|e| ToolError::io(&resolved, e))?;

        Ok(ListDirectoryResponse {
            path: self.display_path(&resolved),
            entries,
            truncated,
        })
    }

    /// Search file contents line by line under `path` (or in `path` itself if it is a file).
    ///
    /// Files that cannot be read as UTF-8 text, or exceed the size limit, are skipped.
    pub fn search_files(
        &self,
        path: &str,
        pattern: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, ToolError> {
        if pattern.is_empty() {
            return Err(ToolError::InvalidArgument("pattern must not be empty".into()));
        }

        let source = if options.regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()?;

        let resolved = self.resolve(path)?;
        let max_results = options.max_results.unwrap_or(self.config.max_results);
        let extensions: Vec<&str> = options
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .collect();

        let mut response = SearchResponse {
            pattern: pattern.to_string(),
            matches: Vec::new(),
            files_scanned: 0,
            truncated: false,
        };

        let mut search_one = |full_path: &Path| -> bool {
            if !extensions.is_empty() {
                let ext = full_path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)) {
                    return true;
                }
            }

            let content = match fs::metadata(full_path) {
                Ok(m) if m.len() <= self.config.max_file_size => {
                    match self.read_cached(full_path, &m) {
                        Ok((content, _)) => content,
                        Err(e) => {
                            tracing::debug!("Skipping {}: {}", full_path.display(), e);
                            return true;
                        }
                    }
                }
                Ok(_) => return true,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", full_path.display(), e);
                    return true;
                }
            };

            response.files_scanned += 1;
            for (idx, line) in content.lines().enumerate() {
                if !matcher.is_match(line) {
                    continue;
                }
                if response.matches.len() >= max_results {
                    response.truncated = true;
                    return false;
                }
                response.matches.push(SearchMatch {
                    path: self.display_path(full_path),
                    line_number: idx + 1,
                    line: shorten(line.trim_end()),
                });
            }
            true
        };

        if resolved.is_file() {
            search_one(&resolved);
        } else {
            let walk_options = WalkOptions {
                max_depth: options.max_depth.unwrap_or(self.config.max_depth),
                include_hidden: options.include_hidden,
            };
            walk(&self.root, &resolved, walk_options, |full_path, entry| {
                if entry.kind == EntryKind::File {
                    search_one(full_path)
                } else {
                    true
                }
            })
            .map_err(|e| ToolError::io(&resolved, e))?;
        }

        tracing::debug!(
            "Search for {:?} scanned {} files, {} matches",
            pattern,
            response.files_scanned,
            response.matches.len()
        );

        Ok(response)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().expect("file cache lock poisoned").stats()
    }

    /// Empty the cache and return the number of entries dropped.
    pub fn clear_cache(&self) -> usize {
        self.cache.lock().expect("file cache lock poisoned").clear()
    }
}

fn shorten(line: &str) -> String {
    match line.char_indices().nth(MAX_LINE_CHARS) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

/// Apply `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
