//! Directory classification.
//!
//! A classifier decides whether a directory holds a loadable unit (a
//! buildable package) and what its slash-separated logical name is. The walker
//! calls it once per visited directory and records the answer verbatim; a
//! failed classification is never an error, only `resolvable == false`.

use std::fs;
use std::path::{Component, Path};

/// Outcome of classifying one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Slash-separated logical name. May be set even when not resolvable so
    /// that unresolvable ancestors can still answer import queries.
    pub import_name: String,
    /// True if the directory holds a loadable unit.
    pub resolvable: bool,
}

/// Decides whether a directory contains a loadable unit.
pub trait PathClassifier: Send + Sync {
    /// Classifies `dir`, which lies at or beneath the walk root `root`.
    fn classify(&self, root: &Path, dir: &Path) -> Classification;
}

impl<F> PathClassifier for F
where
    F: Fn(&Path, &Path) -> Classification + Send + Sync,
{
    fn classify(&self, root: &Path, dir: &Path) -> Classification {
        self(root, dir)
    }
}

/// Default source extensions recognised by [`SourceDirClassifier`].
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["go"];

/// Treats a directory as a package when it directly contains a source file.
///
/// The import name is the directory relative to the walk root, joined with
/// `/`. Files whose names start with `_` or `.` are ignored, matching how
/// package build tooling skips them.
#[derive(Debug, Clone)]
pub struct SourceDirClassifier {
    extensions: Vec<String>,
}

impl Default for SourceDirClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSIONS.iter().copied())
    }
}

impl SourceDirClassifier {
    /// Creates a classifier for the given file extensions (without the dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn is_source_file(&self, name: &str) -> bool {
        if name.starts_with('_') || name.starts_with('.') {
            return false;
        }
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }

    fn contains_source_file(&self, dir: &Path) -> bool {
        let Ok(read_dir) = fs::read_dir(dir) else {
            return false;
        };
        read_dir.filter_map(|entry| entry.ok()).any(|entry| {
            let is_file = entry
                .file_type()
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            is_file && self.is_source_file(&entry.file_name().to_string_lossy())
        })
    }
}

impl PathClassifier for SourceDirClassifier {
    fn classify(&self, root: &Path, dir: &Path) -> Classification {
        Classification {
            import_name: import_name_for(root, dir).unwrap_or_default(),
            resolvable: self.contains_source_file(dir),
        }
    }
}

/// Returns `dir` relative to `root` as a slash-separated name.
///
/// The root itself maps to the empty name; paths outside `root` map to `None`.
pub fn import_name_for(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}
