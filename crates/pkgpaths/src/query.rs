//! Partial-path queries over an index snapshot.
//!
//! - `path` - separator policy and segment anchoring
//! - `matcher` - suffix matching and the resolvable-first fallback

mod matcher;
mod path;

pub use matcher::query_entries;
pub use path::{import_name_matches, import_query, PathStyle};
