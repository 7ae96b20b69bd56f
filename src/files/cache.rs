//! Bounded file-content cache.
//!
//! Entries are keyed by resolved path and modification time, so a file that
//! changes on disk simply misses. When the cache is full the entry inserted
//! first is evicted. Reads do not refresh an entry's position.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: SystemTime,
}

#[derive(Debug, Default)]
pub struct FileCache {
    capacity: usize,
    entries: HashMap<CacheKey, String>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl FileCache {
    /// A capacity of zero disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&mut self, path: &Path, modified: SystemTime) -> Option<&str> {
        let key = CacheKey {
            path: path.to_path_buf(),
            modified,
        };
        match self.entries.get(&key) {
            Some(content) => {
                self.hits += 1;
                Some(content.as_str())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Cache `content` for `path` at `modified`, replacing older versions of the same path.
    pub fn insert(&mut self, path: &Path, modified: SystemTime, content: String) {
        if self.capacity == 0 {
            return;
        }

        self.invalidate(path);

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            tracing::debug!("Evicting {} from file cache", oldest.path.display());
            self.entries.remove(&oldest);
            self.evictions += 1;
        }

        let key = CacheKey {
            path: path.to_path_buf(),
            modified,
        };
        self.order.push_back(key.clone());
        self.entries.insert(key, content);
    }

    /// Drop every cached version of `path`.
    pub fn invalidate(&mut self, path: &Path) {
        let before = self.order.len();
        self.order.retain(|k| k.path != path);
        if self.order.len() != before {
            self.entries.retain(|k, _| k.path != path);
        }
    }

    /// Empty the cache, returning how many entries were dropped. Counters are kept.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order.clear();
        dropped
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}
