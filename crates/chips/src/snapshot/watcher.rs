//! Snapshot File Watcher
//!
//! Watches the snapshot document and pushes every new version through the
//! chip controller. Unchanged chip lists are suppressed by the controller.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use status_chips::{Presenter, StatusChips};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::loader::{LoadError, SnapshotLoader};

/// Snapshot file change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotChange {
    /// The snapshot was written or replaced
    Modified,
    /// The snapshot was deleted
    Removed,
}

/// Snapshot file watcher
pub struct SnapshotWatcher {
    /// Path to the snapshot document
    snapshot_path: PathBuf,
    /// Channel receiver for file events
    rx: mpsc::Receiver<SnapshotChange>,
    /// The underlying watcher (kept alive)
    _watcher: RecommendedWatcher,
}

impl SnapshotWatcher {
    /// Create a new snapshot watcher
    pub fn new(snapshot_path: impl AsRef<Path>) -> Result<Self, notify::Error> {
        let snapshot_path = absolute_path(snapshot_path.as_ref());
        let (tx, rx) = mpsc::channel(100);

        let path_clone = snapshot_path.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if let Some(change) = Self::event_to_change(&path_clone, &event) {
                        let _ = tx.blocking_send(change);
                    }
                }
                Err(e) => {
                    error!("File watcher error: {}", e);
                }
            }
        })?;

        // Editors often replace the file, so watch its directory
        let dir = snapshot_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        info!("Watching snapshot: {}", snapshot_path.display());

        Ok(Self {
            snapshot_path,
            rx,
            _watcher: watcher,
        })
    }

    /// Convert a notify event to a snapshot change
    pub fn event_to_change(snapshot_path: &Path, event: &Event) -> Option<SnapshotChange> {
        if !event.paths.iter().any(|p| p == snapshot_path) {
            return None;
        }

        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => Some(SnapshotChange::Modified),
            EventKind::Remove(_) => Some(SnapshotChange::Removed),
            _ => {
                debug!("Ignoring event kind: {:?}", event.kind);
                None
            }
        }
    }

    /// Absolute path the watcher matches events against
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Wait for the next change to the snapshot file
    pub async fn next_change(&mut self) -> Option<SnapshotChange> {
        self.rx.recv().await
    }

    /// Run the watcher loop until the event channel closes
    pub async fn run<P: Presenter>(mut self, card: &mut StatusChips<P>) {
        info!("Starting snapshot watcher loop");

        while let Some(change) = self.next_change().await {
            match change {
                SnapshotChange::Modified => {
                    if let Err(e) = reload(&self.snapshot_path, card).await {
                        warn!("Failed to reload snapshot: {}", e);
                    }
                }
                SnapshotChange::Removed => {
                    warn!(
                        "Snapshot removed, keeping current chips: {}",
                        self.snapshot_path.display()
                    );
                }
            }
        }

        info!("Snapshot watcher loop ended");
    }
}

/// Resolve the snapshot path the way notify reports it.
///
/// The file may not exist yet, so fall back to canonicalizing its directory.
fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (dir.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Load the snapshot and push it through the controller.
///
/// On failure the previously presented chips stay in place.
pub async fn reload<P: Presenter>(
    path: &Path,
    card: &mut StatusChips<P>,
) -> Result<bool, LoadError> {
    let registries = SnapshotLoader::load(path).await?;
    Ok(card.update(&registries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
    use status_chips::{ChipView, ScopeConfig};
    use tempfile::TempDir;

    const ON: &str = r#"{
        "entities": { "light.hall": { "entity_id": "light.hall", "labels": ["status"] } },
        "states": { "light.hall": { "entity_id": "light.hall", "state": "on", "attributes": {} } }
    }"#;

    #[test]
    fn test_event_mapping() {
        let path = PathBuf::from("/tmp/snap/registries.json");

        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        assert_eq!(
            SnapshotWatcher::event_to_change(&path, &modify),
            Some(SnapshotChange::Modified)
        );

        let create = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        assert_eq!(
            SnapshotWatcher::event_to_change(&path, &create),
            Some(SnapshotChange::Modified)
        );

        let remove = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        assert_eq!(
            SnapshotWatcher::event_to_change(&path, &remove),
            Some(SnapshotChange::Removed)
        );

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        assert_eq!(SnapshotWatcher::event_to_change(&path, &access), None);

        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/snap/other.json"));
        assert_eq!(SnapshotWatcher::event_to_change(&path, &other), None);
    }

    #[test]
    fn test_absolute_path_for_missing_file() {
        // bare names resolve against the working directory
        let bare = absolute_path(Path::new("registries.json"));
        assert!(bare.is_absolute());
        assert_eq!(bare.file_name().unwrap(), "registries.json");

        let temp = TempDir::new().unwrap();
        let dotted = temp.path().join(".").join("registries.json");
        assert_eq!(
            absolute_path(&dotted),
            temp.path().canonicalize().unwrap().join("registries.json")
        );
    }

    #[tokio::test]
    async fn test_watcher_sees_file_created_after_start() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".").join("registries.json");

        let mut watcher = SnapshotWatcher::new(&path).unwrap();
        assert!(watcher.snapshot_path().is_absolute());

        std::fs::write(&path, ON).unwrap();
        let change = tokio::time::timeout(Duration::from_secs(5), watcher.next_change()).await;
        assert_eq!(change.unwrap(), Some(SnapshotChange::Modified));
    }

    #[tokio::test]
    async fn test_reload_pushes_and_suppresses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registries.json");
        std::fs::write(&path, ON).unwrap();

        let mut presented = Vec::new();
        {
            let mut card = StatusChips::new(ScopeConfig::new(), |chips: &[ChipView]| {
                presented.push(chips.len())
            })
            .with_slug("home");

            assert!(reload(&path, &mut card).await.unwrap());
            // same content rewritten
            std::fs::write(&path, ON).unwrap();
            assert!(!reload(&path, &mut card).await.unwrap());

            std::fs::write(&path, ON.replace("\"on\"", "\"off\"")).unwrap();
            assert!(reload(&path, &mut card).await.unwrap());
        }
        assert_eq!(presented, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_chips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registries.json");
        std::fs::write(&path, ON).unwrap();

        let mut card = StatusChips::new(ScopeConfig::new(), status_chips::NullPresenter)
            .with_slug("home");
        reload(&path, &mut card).await.unwrap();

        std::fs::write(&path, "{ broken").unwrap();
        assert!(reload(&path, &mut card).await.is_err());
        assert_eq!(card.chips().len(), 1);
    }
}
