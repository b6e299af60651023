//! Directory index.
//!
//! - `walk` - recursive walk producing one entry per visited directory
//! - `snapshot` - immutable result of one walk
//! - `store` - owner of roots, exclusions and the current snapshot
//! - `build` - rebuild state and bookkeeping

mod build;
mod snapshot;
mod store;
mod walk;

pub use build::IndexBuildState;
pub use snapshot::IndexSnapshot;
pub use store::IndexStore;
pub use walk::{walk_root, walk_roots, WalkData, WalkStats};
