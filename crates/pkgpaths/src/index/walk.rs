//! Filesystem walking that produces a flat, preorder list of entries.
//!
//! - Only directories are visited; files are ignored.
//! - Children are sorted by name before descent, so visitation order is
//!   deterministic and later query ties resolve first-come.
//! - Sibling subtrees are walked in parallel with rayon, and the ordered
//!   collect keeps the output in preorder.
//! - A directory whose base name is excluded is pruned with its whole subtree.
//! - Unreadable directories are still emitted, just without children.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::classify::PathClassifier;
use crate::types::Entry;

/// Data shared by every step of one walk.
pub struct WalkData<'a> {
    /// Number of directories emitted (atomic counter).
    pub num_dirs: AtomicUsize,
    /// Number of subtrees skipped because of an excluded name.
    pub num_pruned: AtomicUsize,
    /// Number of directories that could not be read.
    pub num_errors: AtomicUsize,
    /// Bare directory names to prune.
    pub exclusions: &'a HashSet<String>,
    /// Classifier consulted once per emitted directory.
    pub classifier: &'a dyn PathClassifier,
}

impl<'a> WalkData<'a> {
    pub fn new(exclusions: &'a HashSet<String>, classifier: &'a dyn PathClassifier) -> Self {
        Self {
            num_dirs: AtomicUsize::new(0),
            num_pruned: AtomicUsize::new(0),
            num_errors: AtomicUsize::new(0),
            exclusions,
            classifier,
        }
    }

    /// Returns true if the directory's base name is excluded.
    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.exclusions.contains(name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> WalkStats {
        WalkStats {
            dirs: self.num_dirs.load(Ordering::Relaxed),
            pruned: self.num_pruned.load(Ordering::Relaxed),
            errors: self.num_errors.load(Ordering::Relaxed),
        }
    }
}

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub dirs: usize,
    pub pruned: usize,
    pub errors: usize,
}

/// Walks every root in order and returns the concatenated entries.
pub fn walk_roots(roots: &[PathBuf], walk_data: &WalkData) -> Vec<Entry> {
    let mut entries = Vec::new();
    for root in roots {
        walk_root(root, walk_data, &mut entries);
    }
    entries
}

/// Walks a single root, appending its entries to `out`.
pub fn walk_root(root: &Path, walk_data: &WalkData, out: &mut Vec<Entry>) {
    let is_dir = fs::metadata(root)
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        walk_data.num_errors.fetch_add(1, Ordering::Relaxed);
        log::warn!("skipping root {}: not a readable directory", root.display());
        return;
    }
    out.extend(walk(root, root, walk_data));
}

/// Core recursive walk: the directory itself, then its subtrees in name order.
fn walk(root: &Path, path: &Path, walk_data: &WalkData) -> Vec<Entry> {
    if walk_data.is_excluded(path) {
        walk_data.num_pruned.fetch_add(1, Ordering::Relaxed);
        log::debug!("pruned excluded directory {}", path.display());
        return Vec::new();
    }

    walk_data.num_dirs.fetch_add(1, Ordering::Relaxed);
    let classification = walk_data.classifier.classify(root, path);
    let mut entries = vec![Entry::new(
        path,
        classification.import_name,
        classification.resolvable,
    )];

    let read_dir = match fs::read_dir(path) {
        Ok(iter) => iter,
        Err(error) => {
            // Keep the directory itself, skip its children.
            walk_data.num_errors.fetch_add(1, Ordering::Relaxed);
            log::warn!("unable to read directory {}: {}", path.display(), error);
            return entries;
        }
    };

    // Directories only; file_type() does not follow symlinks.
    let mut children: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_type()
                .map(|file_type| file_type.is_dir())
                .unwrap_or(false)
        })
        .map(|entry| entry.path())
        .collect();
    children.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));

    let subtrees: Vec<Vec<Entry>> = children
        .into_par_iter()
        .map(|child| walk(root, &child, walk_data))
        .collect();
    entries.extend(subtrees.into_iter().flatten());
    entries
}
