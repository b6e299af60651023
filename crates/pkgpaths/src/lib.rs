//! Partial-path resolution over an in-memory directory index.
//!
//! This crate provides:
//! - Directory walking with name-based subtree exclusion
//! - Package classification of visited directories
//! - An index store with atomic replace-on-rebuild semantics
//! - Whole-segment suffix queries with a resolvable-first fallback
//! - A background refresher

pub mod classify;
pub mod error;
pub mod index;
pub mod query;
pub mod refresh;
pub mod types;

// Re-export main types
pub use classify::{Classification, PathClassifier, SourceDirClassifier};
pub use error::{PkgPathsError, Result};
pub use index::{IndexSnapshot, IndexStore};
pub use query::{query_entries, PathStyle};
pub use refresh::{spawn_refresher, RefresherHandle, DEFAULT_REFRESH_INTERVAL};
pub use types::{Entry, IndexStatus, QueryKind};
