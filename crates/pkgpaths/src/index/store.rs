//! IndexStore - the single owner of roots, exclusions and the current snapshot.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use super::build::{unix_now_secs, IndexBuildState, RebuildProgress};
use super::snapshot::IndexSnapshot;
use super::walk::{walk_roots, WalkData};
use crate::classify::{PathClassifier, SourceDirClassifier};
use crate::error::{PkgPathsError, Result};
use crate::query::{query_entries, PathStyle};
use crate::types::{IndexStatus, QueryKind};

/// State guarded by the store's reader/writer lock.
#[derive(Debug, Default)]
struct IndexState {
    roots: Vec<PathBuf>,
    exclusions: HashSet<String>,
    snapshot: Arc<IndexSnapshot>,
}

/// In-memory directory index with atomic replace-on-rebuild semantics.
///
/// Any number of [`query`](Self::query) calls run in parallel over an
/// immutable snapshot. Writers (`set_roots`, `set_exclusions`, `rebuild`) are
/// serialised through a writer lane, so a rebuild excludes other writers for
/// its whole duration. Readers only wait for the final pointer swap and never
/// observe a partially built snapshot.
pub struct IndexStore {
    state: RwLock<IndexState>,
    writer_lane: Mutex<()>,
    classifier: Arc<dyn PathClassifier>,
    style: PathStyle,
    build_state: AtomicU8,
    progress: RebuildProgress,
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("state", &self.state)
            .field("classifier", &"<classifier>")
            .field("style", &self.style)
            .field("build_state", &IndexBuildState::load(&self.build_state))
            .finish()
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new(SourceDirClassifier::default())
    }
}

impl IndexStore {
    /// Creates an empty store with no roots, no exclusions and no entries.
    pub fn new(classifier: impl PathClassifier + 'static) -> Self {
        Self::with_classifier(Arc::new(classifier))
    }

    /// Creates an empty store around a shared classifier.
    pub fn with_classifier(classifier: Arc<dyn PathClassifier>) -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            writer_lane: Mutex::new(()),
            classifier,
            style: PathStyle::native(),
            build_state: AtomicU8::new(IndexBuildState::Idle as u8),
            progress: RebuildProgress::default(),
        }
    }

    /// Sets the separator convention used for directory queries.
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces the root directories.
    ///
    /// Each path is made absolute and lexically cleaned, and duplicates
    /// collapse to one root. Symlinks are kept as given. Fails without touching the current roots if any
    /// path does not exist or is not a directory. Does not rebuild.
    pub fn set_roots<I, P>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut roots = Vec::new();
        let mut seen = HashSet::new();
        for path in paths {
            let root = resolve_root(path.as_ref())?;
            if seen.insert(root.clone()) {
                roots.push(root);
            }
        }

        let _writer = self.writer_lane.lock();
        log::debug!("index roots set to {roots:?}");
        self.state.write().roots = roots;
        Ok(())
    }

    /// Replaces the set of excluded directory names.
    pub fn set_exclusions<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exclusions: HashSet<String> = names.into_iter().map(Into::into).collect();

        let _writer = self.writer_lane.lock();
        log::debug!("index exclusions set to {} names", exclusions.len());
        self.state.write().exclusions = exclusions;
    }

    /// Replaces the exclusion set with the whitespace-separated names read
    /// from `reader`.
    pub fn set_exclusions_from_reader<R: Read>(&self, mut reader: R) -> io::Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.set_exclusions(text.split_whitespace());
        Ok(())
    }

    /// Walks the current roots and swaps in the resulting snapshot.
    ///
    /// Concurrent calls are serialised: a second caller waits for the first
    /// and then performs its own fresh walk.
    pub fn rebuild(&self) {
        let _writer = self.writer_lane.lock();
        let (roots, exclusions) = {
            let state = self.state.read();
            (state.roots.clone(), state.exclusions.clone())
        };

        self.build_state
            .store(IndexBuildState::Building as u8, Ordering::Relaxed);
        let started = Instant::now();

        let walk_data = WalkData::new(&exclusions, self.classifier.as_ref());
        let entries = walk_roots(&roots, &walk_data);
        let snapshot = Arc::new(IndexSnapshot::new(entries, walk_data.stats()));
        let indexed = snapshot.len();
        let resolvable = snapshot.resolvable_len();

        self.state.write().snapshot = snapshot;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.progress.record(unix_now_secs(), elapsed_ms);
        self.build_state
            .store(IndexBuildState::Ready as u8, Ordering::Relaxed);

        log::info!(
            "indexed {} directories ({} resolvable) under {} roots in {}ms",
            indexed,
            resolvable,
            roots.len(),
            elapsed_ms,
        );
    }

    /// Returns the full paths or import names matching a partial path.
    ///
    /// An unmatched query yields an empty vector.
    pub fn query(&self, text: &str, kind: QueryKind) -> Vec<String> {
        let snapshot = self.snapshot();
        query_entries(snapshot.entries(), text, kind, self.style)
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.state.read().snapshot.clone()
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.state.read().roots.clone()
    }

    /// Returns the excluded names, sorted.
    pub fn exclusions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().exclusions.iter().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns the index status.
    pub fn status(&self) -> IndexStatus {
        let (roots, snapshot) = {
            let state = self.state.read();
            (state.roots.clone(), state.snapshot.clone())
        };
        let progress = self.progress.snapshot();
        let stats = snapshot.stats();

        IndexStatus {
            state: IndexBuildState::load(&self.build_state).as_str().to_string(),
            roots: roots
                .iter()
                .map(|root| root.to_string_lossy().to_string())
                .collect(),
            exclusions: self.exclusions(),
            indexed_entries: snapshot.len(),
            resolvable_entries: snapshot.resolvable_len(),
            pruned_dirs: stats.pruned,
            errors: stats.errors,
            rebuild_count: progress.rebuild_count,
            last_rebuild_at: progress.finished_at,
            last_rebuild_ms: progress.elapsed_ms,
        }
    }
}

/// Validates a root and resolves it to a clean absolute path.
fn resolve_root(path: &Path) -> Result<PathBuf> {
    let metadata = fs::metadata(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => PkgPathsError::PathNotFound(path.to_path_buf()),
        _ => PkgPathsError::Io(error),
    })?;
    if !metadata.is_dir() {
        return Err(PkgPathsError::NotADirectory(path.to_path_buf()));
    }
    let absolute = std::path::absolute(path)?;
    Ok(clean_path(&absolute))
}

/// Drops `.` and folds `..` into its parent without touching the filesystem.
/// `path` must already be absolute.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root.
            Component::ParentDir => {
                cleaned.pop();
            }
            _ => cleaned.push(component),
        }
    }
    cleaned
}
