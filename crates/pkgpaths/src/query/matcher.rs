//! Suffix matching with the resolvable-first fallback policy.

use super::path::{import_name_matches, import_query, PathStyle};
use crate::types::{Entry, QueryKind};

/// Returns the full paths or import names of entries matching `query`.
///
/// An entry matches when its anchored comparison string ends with the
/// anchored query. Resolvable matches win; when there are none, the
/// unresolvable matches (typically ancestors of real packages) are returned
/// instead. Results keep the order of `entries`.
///
/// An empty query lists every entry, under the same two-tier rule.
pub fn query_entries(
    entries: &[Entry],
    query: &str,
    kind: QueryKind,
    style: PathStyle,
) -> Vec<String> {
    let matcher = EntryMatcher::new(query, kind, style);

    // Resolvable paths hold packages. Unresolvable ones lead to them.
    let mut resolvable = Vec::new();
    let mut unresolvable = Vec::new();
    for entry in entries {
        let Some(path) = matcher.matched_path(entry) else {
            continue;
        };
        if entry.is_resolvable() {
            resolvable.push(path);
        } else if resolvable.is_empty() {
            unresolvable.push(path);
        }
    }

    if resolvable.is_empty() {
        unresolvable
    } else {
        resolvable
    }
}

/// A query compiled for one kind and path style.
#[derive(Debug, Clone)]
struct EntryMatcher {
    anchored: Option<String>,
    kind: QueryKind,
    style: PathStyle,
}

impl EntryMatcher {
    fn new(query: &str, kind: QueryKind, style: PathStyle) -> Self {
        let anchored = (!query.is_empty()).then(|| match kind {
            QueryKind::Dirs => style.dir_query(query),
            QueryKind::Imports => import_query(query),
        });
        Self {
            anchored,
            kind,
            style,
        }
    }

    /// Returns the string reported for `entry` if it matches.
    fn matched_path(&self, entry: &Entry) -> Option<String> {
        match self.kind {
            QueryKind::Dirs => {
                let subject = self.style.dir_subject(entry.full_path());
                let matched = match &self.anchored {
                    Some(anchored) => subject.ends_with(anchored.as_str()),
                    None => true,
                };
                matched.then(|| subject.into_owned())
            }
            QueryKind::Imports => {
                let matched = match &self.anchored {
                    Some(anchored) => import_name_matches(entry.import_name(), anchored),
                    None => true,
                };
                matched.then(|| entry.import_name().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(rows: &[(&str, &str, bool)]) -> Vec<Entry> {
        rows.iter()
            .map(|(full_path, import_name, resolvable)| {
                Entry::new(*full_path, *import_name, *resolvable)
            })
            .collect()
    }

    fn basic_entries() -> Vec<Entry> {
        entries(&[
            ("/root/a/a", "a/a", true),
            ("/root/b/a", "b/a", true),
            ("/root/a", "a", true),
            ("/root/ab", "ab", true),
            ("/root/a/b", "a/b", false),
            ("/long path/ab/ab", "ab/ab", true),
            ("/long/path/ab/a.b", "ab/a.b", true),
            ("/c-c/c.c", "c-c/c.c", false),
            ("/c-c/c.c/c.c", "c-c/c.c/c.c", true),
            ("/a/b/c", "a/b/c", true),
            ("./d/d", "d/d", false),
        ])
    }

    /// Same fixture with backslash separators, as indexed on Windows.
    fn windows_entries() -> Vec<Entry> {
        basic_entries()
            .into_iter()
            .map(|entry| {
                let full_path = entry.full_path().to_string_lossy().replace('/', "\\");
                Entry::new(full_path, entry.import_name(), entry.is_resolvable())
            })
            .collect()
    }

    #[test]
    fn import_queries() {
        let index = basic_entries();
        let cases: &[(&str, &[&str])] = &[
            ("a", &["a/a", "b/a", "a"]),
            ("a/a", &["a/a"]),
            ("b", &["a/b"]),
            ("ab", &["ab", "ab/ab"]),
            ("a.b", &["ab/a.b"]),
            ("c", &["a/b/c"]),
            ("c-c/c.c", &["c-c/c.c"]),
            ("c.c", &["c-c/c.c/c.c"]),
        ];
        for (query, expected) in cases {
            let actual = query_entries(&index, query, QueryKind::Imports, PathStyle::UNIX);
            assert_eq!(actual, *expected, "imports/{query}");
        }
    }

    #[test]
    fn dir_queries() {
        let index = basic_entries();
        let cases: &[(&str, &[&str])] = &[
            ("a", &["/root/a/a", "/root/b/a", "/root/a"]),
            ("a/a", &["/root/a/a"]),
            ("b", &["/root/a/b"]),
            ("ab", &["/root/ab", "/long path/ab/ab"]),
            ("a.b", &["/long/path/ab/a.b"]),
            ("c", &["/a/b/c"]),
            ("c-c/c.c", &["/c-c/c.c"]),
            ("c.c", &["/c-c/c.c/c.c"]),
        ];
        for (query, expected) in cases {
            let actual = query_entries(&index, query, QueryKind::Dirs, PathStyle::UNIX);
            assert_eq!(actual, *expected, "dirs/{query}");
        }
    }

    #[test]
    fn dir_queries_with_windows_separators() {
        let index = windows_entries();
        assert_eq!(
            query_entries(&index, "a/a", QueryKind::Dirs, PathStyle::WINDOWS),
            vec!["\\root\\a\\a"]
        );
        assert_eq!(
            query_entries(&index, "c-c/c.c", QueryKind::Dirs, PathStyle::WINDOWS),
            vec!["\\c-c\\c.c"]
        );
        // Import names stay slash separated regardless of the path style.
        assert_eq!(
            query_entries(&index, "a/a", QueryKind::Imports, PathStyle::WINDOWS),
            vec!["a/a"]
        );
    }

    #[test]
    fn whole_segment_boundary() {
        let index = entries(&[("/src/paxos", "paxos", true), ("/src/os", "os", true)]);
        assert_eq!(
            query_entries(&index, "os", QueryKind::Imports, PathStyle::UNIX),
            vec!["os"]
        );
        assert_eq!(
            query_entries(&index, "os", QueryKind::Dirs, PathStyle::UNIX),
            vec!["/src/os"]
        );
    }

    #[test]
    fn resolvable_matches_hide_unresolvable_ones() {
        let index = entries(&[("/src/y/x", "y/x", false), ("/src/x", "x", true)]);
        assert_eq!(
            query_entries(&index, "x", QueryKind::Imports, PathStyle::UNIX),
            vec!["x"]
        );
    }

    #[test]
    fn unresolvable_ancestors_are_returned_when_nothing_resolves() {
        let index = entries(&[
            ("/src/code.google.com/p/go.net", "code.google.com/p/go.net", false),
            ("/src/code.google.com/p/go.net/html", "code.google.com/p/go.net/html", true),
        ]);
        assert_eq!(
            query_entries(&index, "go.net", QueryKind::Imports, PathStyle::UNIX),
            vec!["code.google.com/p/go.net"]
        );
    }

    #[test]
    fn concrete_scenario() {
        let index = entries(&[
            ("/root/a/a", "a/a", true),
            ("/root/a", "a", true),
            ("/root/a/b", "a/b", false),
        ]);
        assert_eq!(
            query_entries(&index, "a", QueryKind::Dirs, PathStyle::UNIX),
            vec!["/root/a/a", "/root/a"]
        );
        assert_eq!(
            query_entries(&index, "b", QueryKind::Imports, PathStyle::UNIX),
            vec!["a/b"]
        );
    }

    #[test]
    fn no_match_is_empty() {
        let index = basic_entries();
        assert!(query_entries(&index, "zzz", QueryKind::Dirs, PathStyle::UNIX).is_empty());
        assert!(query_entries(&index, "dirs/a", QueryKind::Dirs, PathStyle::UNIX).is_empty());
        assert!(query_entries(&[], "a", QueryKind::Imports, PathStyle::UNIX).is_empty());
    }

    #[test]
    fn empty_query_lists_resolvable_entries() {
        let index = entries(&[
            ("/src", "", false),
            ("/src/fmt", "fmt", true),
            ("/src/net", "net", false),
            ("/src/net/http", "net/http", true),
        ]);
        assert_eq!(
            query_entries(&index, "", QueryKind::Imports, PathStyle::UNIX),
            vec!["fmt", "net/http"]
        );
        assert_eq!(
            query_entries(&index, "", QueryKind::Dirs, PathStyle::UNIX),
            vec!["/src/fmt", "/src/net/http"]
        );
    }

    #[test]
    fn empty_query_falls_back_to_unresolvable_entries() {
        let index = entries(&[("/src", "", false), ("/src/net", "net", false)]);
        assert_eq!(
            query_entries(&index, "", QueryKind::Dirs, PathStyle::UNIX),
            vec!["/src", "/src/net"]
        );
    }
}
