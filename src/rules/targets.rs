//! Target resolution helpers shared by the cleanup rules
//!
//! A target names a filesystem location and how much of it a rule wants
//! removed. Age checks and sizing never follow symlinks.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// How much of a target path a rule wants removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    /// Remove the entries inside the directory, keep the directory itself
    Contents,
    /// Remove the path itself
    Tree,
}

/// A filesystem location a rule wants cleaned
#[derive(Debug, Clone)]
pub struct Target {
    pub path: PathBuf,
    pub scope: TargetScope,
    /// Only remove entries last modified at least this long ago
    pub min_age: Option<Duration>,
}

impl Target {
    pub fn contents(path: PathBuf) -> Self {
        Self {
            path,
            scope: TargetScope::Contents,
            min_age: None,
        }
    }

    pub fn tree(path: PathBuf) -> Self {
        Self {
            path,
            scope: TargetScope::Tree,
            min_age: None,
        }
    }

    pub fn aged(mut self, min_age: Duration) -> Self {
        self.min_age = Some(min_age);
        self
    }
}

/// Targets plus human-readable notes produced while resolving them
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    pub targets: Vec<Target>,
    pub notes: Vec<String>,
}

impl TargetSet {
    pub fn push(&mut self, target: Target) {
        self.targets.push(target);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// True when the entry's mtime is at least `min_age` in the past.
/// Unreadable metadata and future mtimes count as too new, so the entry is
/// left alone.
pub fn old_enough(path: &Path, min_age: Duration) -> bool {
    if min_age.is_zero() {
        return true;
    }

    let modified = match fs::symlink_metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => modified,
        Err(_) => return false,
    };

    match SystemTime::now().duration_since(modified) {
        Ok(age) => age >= min_age,
        Err(_) => false,
    }
}

/// Recursive size of a filesystem entry, without following symlinks
pub fn entry_size(path: &Path) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return 0,
    };

    if metadata.is_dir() {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry_size(&entry.path()))
            .sum()
    } else {
        metadata.len()
    }
}
