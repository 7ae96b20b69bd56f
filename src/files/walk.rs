//! Depth-bounded directory traversal.
//!
//! Unreadable directories and entries are skipped with a warning; a traversal
//! only fails if its starting point cannot be read. Symlinks are not followed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directories that are never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target", "bin", "obj"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// An entry found while walking, with its path relative to the walk's base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    /// 0 for entries directly inside the starting directory.
    pub depth: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    pub max_depth: usize,
    pub include_hidden: bool,
}

/// Walk `dir`, calling `visit` for each entry in sorted order.
///
/// Entry paths are reported relative to `base`. A directory at depth `d` is
/// descended into only when `d < max_depth`. Returning `false` from `visit`
/// stops the walk.
pub fn walk<F>(base: &Path, dir: &Path, options: WalkOptions, mut visit: F) -> std::io::Result<()>
where
    F: FnMut(&Path, &WalkEntry) -> bool,
{
    let entries = sorted_entries(dir)?;
    walk_entries(base, entries, 0, options, &mut visit);
    Ok(())
}

fn walk_entries<F>(
    base: &Path,
    entries: Vec<fs::DirEntry>,
    depth: usize,
    options: WalkOptions,
    visit: &mut F,
) -> bool
where
    F: FnMut(&Path, &WalkEntry) -> bool,
{
    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !options.include_hidden && name.starts_with('.') {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if metadata.file_type().is_symlink() {
            continue;
        }

        let full_path = entry.path();
        let relative = full_path
            .strip_prefix(base)
            .unwrap_or(&full_path)
            .to_path_buf();
        let is_dir = metadata.is_dir();

        let walk_entry = WalkEntry {
            path: relative,
            kind: if is_dir {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            size: if is_dir { 0 } else { metadata.len() },
            depth,
        };

        if !visit(&full_path, &walk_entry) {
            return false;
        }

        if is_dir && depth < options.max_depth && !SKIPPED_DIRS.contains(&&*name) {
            let children = match sorted_entries(&full_path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping directory {}: {}", full_path.display(), e);
                    continue;
                }
            };
            if !walk_entries(base, children, depth + 1, options, visit) {
                return false;
            }
        }
    }
    true
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
