//! In-memory project tree and its materialization onto disk
//!
//! A [`ProjectTree`] maps `/`-separated relative paths to text content. All
//! composition happens against this structure; nothing touches the filesystem
//! until [`ProjectTree::materialize`] runs.

use crate::error::{Result, ScaffoldError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTree {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
}

/// Normalize a relative path: forward slashes, no leading `./` or `/`,
/// no trailing slash. `..` is resolved lexically and never climbs above the
/// tree root.
fn normalize(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for seg in normalized.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn is_within(candidate: &str, root: &str) -> bool {
    candidate == root
        || (candidate.len() > root.len()
            && candidate.starts_with(root)
            && candidate.as_bytes()[root.len()] == b'/')
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a file, replacing any existing content. Parent directories are
    /// implied by the path.
    pub fn write(&mut self, path: &str, content: impl Into<String>) {
        let path = normalize(path);
        self.files.insert(path, content.into());
    }

    /// Remove a file or a directory and everything below it. Absent paths are
    /// not an error. Returns the number of entries removed.
    pub fn remove(&mut self, path: &str) -> usize {
        let path = normalize(path);
        let before = self.files.len() + self.dirs.len();
        self.files.retain(|p, _| !is_within(p, &path));
        self.dirs.retain(|d| !is_within(d, &path));
        before - (self.files.len() + self.dirs.len())
    }

    /// Record a directory that must exist even if it ends up empty.
    pub fn ensure_dir(&mut self, path: &str) {
        let path = normalize(path);
        if !path.is_empty() {
            self.dirs.insert(path);
        }
    }

    pub fn read(&self, path: &str) -> Option<&str> {
        self.files.get(&normalize(path)).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    /// File paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file and ensured directory below `root`, creating parent
    /// directories as needed. Returns the written file paths.
    pub async fn materialize(&self, root: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(root)
            .await
            .map_err(|e| ScaffoldError::fs(root, e))?;

        for dir in &self.dirs {
            let target = root.join(dir);
            fs::create_dir_all(&target)
                .await
                .map_err(|e| ScaffoldError::fs(&target, e))?;
        }

        let mut written = Vec::with_capacity(self.files.len());
        for (path, content) in &self.files {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ScaffoldError::fs(parent, e))?;
            }
            fs::write(&target, content)
                .await
                .map_err(|e| ScaffoldError::fs(&target, e))?;
            written.push(target);
        }

        tracing::debug!(root = %root.display(), files = written.len(), "materialized project tree");
        Ok(written)
    }
}
