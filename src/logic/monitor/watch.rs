//! Filesystem change notifications.
//!
//! `WatchSource` is the capability the correlator depends on; the `notify`
//! backend is the default implementation. Dropping a `Subscription` releases
//! the underlying OS watch.

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch root does not exist or is not a directory: {0}")]
    RootMissing(PathBuf),
    #[error("watch backend error: {0}")]
    Backend(#[from] notify::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsEventKind {
    Created,
    Modified,
    Deleted,
}

/// One file-level notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FsEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Live stream of change events
pub struct Subscription {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    _guard: Option<Box<dyn Send>>,
}

impl Subscription {
    pub fn new(events: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self {
            events,
            _guard: None,
        }
    }

    /// Keep `guard` alive for as long as the subscription exists
    pub fn with_guard<G: Send + 'static>(events: mpsc::UnboundedReceiver<ChangeEvent>, guard: G) -> Self {
        Self {
            events,
            _guard: Some(Box::new(guard)),
        }
    }

    /// Next event, `None` once the source is gone
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }
}

/// Supplier of recursive change notifications under a root
pub trait WatchSource: Send {
    fn subscribe(&mut self, root: &Path) -> Result<Subscription, WatchError>;
}

// ============================================================================
// NOTIFY BACKEND
// ============================================================================

/// OS-native watcher (inotify, FSEvents, ReadDirectoryChangesW)
#[derive(Debug, Default)]
pub struct NotifyWatchSource;

impl WatchSource for NotifyWatchSource {
    fn subscribe(&mut self, root: &Path) -> Result<Subscription, WatchError> {
        if !root.is_dir() {
            return Err(WatchError::RootMissing(root.to_path_buf()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in translate(&event) {
                    let _ = tx.send(change);
                }
            }
            Err(e) => log::warn!("Watch error: {:?}", e),
        })?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        log::info!("Watching {} recursively", root.display());

        Ok(Subscription::with_guard(rx, watcher))
    }
}

/// Map a backend event to file-level change events.
///
/// Directory events and renames produce nothing.
pub fn translate(event: &Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Create(CreateKind::Folder) => return Vec::new(),
        EventKind::Create(_) => FsEventKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => return Vec::new(),
        EventKind::Modify(_) => FsEventKind::Modified,
        EventKind::Remove(RemoveKind::Folder) => return Vec::new(),
        EventKind::Remove(_) => FsEventKind::Deleted,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter(|path| kind == FsEventKind::Deleted || !path.is_dir())
        .map(|path| ChangeEvent::new(path.clone(), kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, ModifyKind, RenameMode};

    #[test]
    fn test_translate_file_events() {
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path("/data/a.txt".into());
        assert_eq!(translate(&created), vec![ChangeEvent::new("/data/a.txt", FsEventKind::Created)]);

        let modified = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path("/data/a.txt".into());
        assert_eq!(translate(&modified), vec![ChangeEvent::new("/data/a.txt", FsEventKind::Modified)]);

        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path("/data/a.txt".into());
        assert_eq!(translate(&removed), vec![ChangeEvent::new("/data/a.txt", FsEventKind::Deleted)]);
    }

    #[test]
    fn test_translate_drops_folders_and_renames() {
        let folder = Event::new(EventKind::Create(CreateKind::Folder)).add_path("/data/sub".into());
        assert!(translate(&folder).is_empty());

        let rename = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path("/data/a.txt".into())
            .add_path("/data/b.txt".into());
        assert!(translate(&rename).is_empty());

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path("/data/a.txt".into());
        assert!(translate(&access).is_empty());
    }

    #[test]
    fn test_subscribe_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = NotifyWatchSource.subscribe(&dir.path().join("absent"));
        assert!(matches!(result, Err(WatchError::RootMissing(_))));
    }

    #[tokio::test]
    async fn test_subscription_ends_when_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscription = Subscription::new(rx);
        tx.send(ChangeEvent::new("/data/a.txt", FsEventKind::Deleted)).unwrap();
        drop(tx);

        assert_eq!(subscription.next().await.map(|e| e.kind), Some(FsEventKind::Deleted));
        assert_eq!(subscription.next().await, None);
    }
}
