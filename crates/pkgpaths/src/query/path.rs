//! Query normalization.
//!
//! Queries are anchored on whole path segments by prefixing them with the
//! separator of the space they are matched in: the platform separator for
//! directory paths, `/` for import names. A query for `os` then becomes
//! `/os`, which `/src/os` ends with and `/src/paxos` does not.

use std::borrow::Cow;
use std::path::{Path, MAIN_SEPARATOR};

/// Separator convention used to normalize directory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStyle {
    separator: char,
}

impl PathStyle {
    /// Forward-slash separated paths.
    pub const UNIX: Self = Self { separator: '/' };
    /// Backslash separated paths.
    pub const WINDOWS: Self = Self { separator: '\\' };

    /// The convention of the host platform.
    pub const fn native() -> Self {
        Self {
            separator: MAIN_SEPARATOR,
        }
    }

    pub const fn separator(self) -> char {
        self.separator
    }

    /// Converts a slash-separated directory query to this style and anchors it.
    pub fn dir_query(self, query: &str) -> String {
        let mut normalized = String::with_capacity(query.len() + 1);
        normalized.push(self.separator);
        if self.separator == '/' {
            normalized.push_str(query);
        } else {
            normalized.extend(query.chars().map(|c| if c == '/' { self.separator } else { c }));
        }
        normalized
    }

    /// The string a directory query is compared against.
    pub fn dir_subject(self, path: &Path) -> Cow<'_, str> {
        path.to_string_lossy()
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

/// Anchors an import query on a segment boundary.
pub fn import_query(query: &str) -> String {
    format!("/{query}")
}

/// Returns true if the slash-prefixed import name ends with `anchored_query`.
pub fn import_name_matches(import_name: &str, anchored_query: &str) -> bool {
    // Same as `format!("/{import_name}").ends_with(anchored_query)` without
    // allocating per entry.
    let Some(rest) = anchored_query.strip_prefix('/') else {
        return false;
    };
    if rest.len() == import_name.len() {
        import_name == rest
    } else if rest.len() < import_name.len() {
        import_name.ends_with(anchored_query)
    } else {
        false
    }
}
