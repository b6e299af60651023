//! Core types shared by the walker, the index store and the query engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One classified directory.
///
/// `full_path` uses the platform separator; `import_name` is always
/// slash-separated. Entries are never mutated after the walk creates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    full_path: PathBuf,
    import_name: String,
    resolvable: bool,
}

impl Entry {
    pub fn new(
        full_path: impl Into<PathBuf>,
        import_name: impl Into<String>,
        resolvable: bool,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            import_name: import_name.into(),
            resolvable,
        }
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn import_name(&self) -> &str {
        &self.import_name
    }

    /// True if the classifier confirmed a loadable unit in this directory.
    pub fn is_resolvable(&self) -> bool {
        self.resolvable
    }
}

/// What a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Match slash-separated import names, return import names.
    Imports,
    /// Match absolute directory paths, return directory paths.
    Dirs,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Dirs => "dirs",
        }
    }
}

/// Index status information.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    /// Current state of the index.
    pub state: String,
    /// Configured root directories.
    pub roots: Vec<String>,
    /// Directory names pruned during the walk, sorted.
    pub exclusions: Vec<String>,
    /// Number of entries in the current snapshot.
    pub indexed_entries: usize,
    /// Number of entries holding a loadable unit.
    pub resolvable_entries: usize,
    /// Subtrees skipped because their name is excluded.
    pub pruned_dirs: usize,
    /// Directories that could not be read during the last walk.
    pub errors: usize,
    /// Count of completed rebuilds since the store was created.
    pub rebuild_count: u64,
    /// Unix timestamp when the last rebuild finished.
    pub last_rebuild_at: Option<u64>,
    /// Wall-clock duration of the last rebuild.
    pub last_rebuild_ms: Option<u64>,
}
