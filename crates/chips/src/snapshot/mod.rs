//! Registry snapshots
//!
//! Loading host registry documents from disk and following them as they
//! change.

mod loader;
mod watcher;

pub use loader::{LoadError, SnapshotFormat, SnapshotLoader};
pub use watcher::{SnapshotChange, SnapshotWatcher, reload};
