use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::*;
use crate::logic::alert::{Alert, AlertKind, ChannelSink};
use crate::logic::baseline::{build, normalize_path, BaselineStore};

struct Fixture {
    dir: tempfile::TempDir,
    correlator: EventCorrelator,
    baseline: BaselineHandle,
    alerts: mpsc::UnboundedReceiver<Alert>,
}

impl Fixture {
    /// Root with `files` baselined, each containing "v0"
    fn new(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            fs::write(dir.path().join(name), "v0").unwrap();
        }
        let baseline = BaselineStore::spawn(build(dir.path()));
        let (sink, alerts) = ChannelSink::new();
        let correlator = EventCorrelator::new(baseline.clone(), Arc::new(sink), &MassChangeConfig::default());
        Self { dir, correlator, baseline, alerts }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    async fn modify(&mut self, name: &str, content: &str, at: Instant) {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        self.correlator
            .handle(ChangeEvent::new(path, FsEventKind::Modified), at)
            .await
            .unwrap();
    }

    fn drain(&mut self) -> Vec<AlertKind> {
        let mut kinds = Vec::new();
        while let Ok(alert) = self.alerts.try_recv() {
            kinds.push(alert.kind);
        }
        kinds
    }
}

fn key(path: &Path) -> String {
    normalize_path(path).unwrap()
}

#[tokio::test]
async fn test_modification_updates_baseline_and_alerts() {
    let mut fx = Fixture::new(&["a.txt"]);
    let t0 = Instant::now();

    fx.modify("a.txt", "encrypted", t0).await;

    let alert = fx.alerts.try_recv().unwrap();
    assert_eq!(alert.kind, AlertKind::Modified);
    assert_eq!(alert.path, Some(key(&fx.path("a.txt"))));

    let stored = fx.baseline.lookup(&key(&fx.path("a.txt"))).await.unwrap();
    assert_eq!(stored, Some(crate::logic::baseline::hash_file(&fx.path("a.txt")).unwrap()));
    assert_eq!(fx.correlator.pending_modifications(), 1);
}

#[tokio::test]
async fn test_unchanged_digest_is_silent() {
    let mut fx = Fixture::new(&["a.txt"]);
    fx.modify("a.txt", "v0", Instant::now()).await;
    assert!(fx.drain().is_empty());
    assert_eq!(fx.correlator.pending_modifications(), 0);
}

#[tokio::test]
async fn test_untracked_modification_ignored() {
    let mut fx = Fixture::new(&["a.txt"]);
    fx.modify("late.txt", "new content", Instant::now()).await;

    assert!(fx.drain().is_empty());
    assert_eq!(fx.baseline.lookup(&key(&fx.path("late.txt"))).await.unwrap(), None);
}

#[tokio::test]
async fn test_excluded_names_never_diffed() {
    let mut fx = Fixture::new(&["a.txt"]);
    let store = fx.path("hash_db.json");
    let mut tampered = fx.baseline.snapshot().await.unwrap();
    tampered.insert(key(&store), "0".repeat(64));
    fx.baseline.replace(tampered).await.unwrap();

    fx.modify("hash_db.json", "{}", Instant::now()).await;
    assert!(fx.drain().is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_non_utf8_event_is_dropped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mut fx = Fixture::new(&["a.txt"]);
    let odd = fx.path("a.txt").with_file_name(OsStr::from_bytes(b"a\xff.txt"));
    fs::write(&odd, "locked").unwrap();
    let before = fx.baseline.snapshot().await.unwrap();

    for kind in [FsEventKind::Created, FsEventKind::Modified, FsEventKind::Deleted] {
        fx.correlator
            .handle(ChangeEvent::new(odd.clone(), kind), Instant::now())
            .await
            .unwrap();
    }

    assert!(fx.drain().is_empty());
    assert_eq!(fx.baseline.snapshot().await.unwrap(), before);
    assert_eq!(fx.correlator.pending_modifications(), 0);
}

#[tokio::test]
async fn test_created_and_deleted_alert_without_mutation() {
    let mut fx = Fixture::new(&["a.txt"]);
    let t0 = Instant::now();
    let before = fx.baseline.snapshot().await.unwrap();

    fx.correlator
        .handle(ChangeEvent::new(fx.path("new.txt"), FsEventKind::Created), t0)
        .await
        .unwrap();
    fs::remove_file(fx.path("a.txt")).unwrap();
    fx.correlator
        .handle(ChangeEvent::new(fx.path("a.txt"), FsEventKind::Deleted), t0)
        .await
        .unwrap();

    assert_eq!(fx.drain(), vec![AlertKind::NewFile, AlertKind::Deleted]);
    // stale entry survives deletion
    assert_eq!(fx.baseline.snapshot().await.unwrap(), before);
}

#[tokio::test]
async fn test_mass_change_fires_once_then_rearms() {
    let names = ["f1", "f2", "f3", "f4", "f5", "f6", "f7"];
    let mut fx = Fixture::new(&names);
    let t0 = Instant::now();

    for (i, name) in names[..6].iter().enumerate() {
        fx.modify(name, "locked", t0 + Duration::from_secs(i as u64)).await;
    }

    let kinds = fx.drain();
    assert_eq!(kinds.iter().filter(|k| **k == AlertKind::Modified).count(), 6);
    assert_eq!(kinds.iter().filter(|k| **k == AlertKind::MassChange).count(), 1);
    // modified alert precedes the burst alert it completes
    assert_eq!(kinds.last(), Some(&AlertKind::MassChange));
    assert_eq!(fx.correlator.pending_modifications(), 0);

    fx.modify("f7", "locked", t0 + Duration::from_secs(6)).await;
    assert_eq!(fx.drain(), vec![AlertKind::Modified]);
    assert_eq!(fx.correlator.pending_modifications(), 1);
}

#[tokio::test]
async fn test_spread_out_modifications_do_not_fire() {
    let names = ["f1", "f2", "f3", "f4", "f5", "f6"];
    let mut fx = Fixture::new(&names);
    let t0 = Instant::now();

    for name in &names[..5] {
        fx.modify(name, "locked", t0).await;
    }
    fx.modify("f6", "locked", t0 + Duration::from_secs(11)).await;

    assert!(!fx.drain().contains(&AlertKind::MassChange));
    assert_eq!(fx.correlator.pending_modifications(), 1);
}

#[tokio::test]
async fn test_modification_exactly_window_old_has_expired() {
    let names = ["f1", "f2", "f3", "f4", "f5", "f6"];
    let mut fx = Fixture::new(&names);
    let t0 = Instant::now();

    fx.modify("f1", "locked", t0).await;
    for name in &names[1..] {
        fx.modify(name, "locked", t0 + Duration::from_secs(10)).await;
    }

    assert!(!fx.drain().contains(&AlertKind::MassChange));
    assert_eq!(fx.correlator.pending_modifications(), 5);
}

#[tokio::test]
async fn test_stopped_store_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "v0").unwrap();

    let (sink, _alerts) = ChannelSink::new();
    let handle = BaselineHandle::closed();
    let mut correlator = EventCorrelator::new(handle, Arc::new(sink), &MassChangeConfig::default());

    let result = correlator
        .handle(ChangeEvent::new(file, FsEventKind::Modified), Instant::now())
        .await;
    assert!(matches!(result, Err(BaselineError::StoreClosed)));
}

// ============================================================================
// FULL LOOP
// ============================================================================

struct ScriptedWatchSource {
    events: Option<mpsc::UnboundedReceiver<ChangeEvent>>,
}

impl WatchSource for ScriptedWatchSource {
    fn subscribe(&mut self, _root: &Path) -> Result<Subscription, WatchError> {
        let events = self.events.take().expect("subscribed twice");
        Ok(Subscription::new(events))
    }
}

#[tokio::test]
async fn test_spawned_monitor_streams_alerts_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "hello").unwrap();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut source = ScriptedWatchSource { events: Some(rx) };
    let (sink, mut alerts) = ChannelSink::new();

    let monitor = spawn(
        dir.path(),
        build(dir.path()),
        &mut source,
        Arc::new(sink),
        &MassChangeConfig::default(),
    )
    .unwrap();

    fs::write(&a, "hello!").unwrap();
    tx.send(ChangeEvent::new(a.clone(), FsEventKind::Modified)).unwrap();

    let alert = tokio::time::timeout(Duration::from_secs(5), alerts.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert.kind, AlertKind::Modified);

    // manual scan against the live baseline sees the already-absorbed change
    assert!(monitor.baseline.scan().await.unwrap().is_empty());

    tokio::time::timeout(Duration::from_secs(5), monitor.stop())
        .await
        .expect("monitor did not stop");
}

#[tokio::test]
async fn test_notify_backend_keys_match_baseline() {
    let dir = tempfile::tempdir().unwrap();
    // backends report resolved paths (e.g. /private/var on macOS)
    let root = dir.path().canonicalize().unwrap();
    let a = root.join("a.txt");
    fs::write(&a, "hello").unwrap();

    let (sink, mut alerts) = ChannelSink::new();
    let monitor = spawn(
        &root,
        build(&root),
        &mut NotifyWatchSource,
        Arc::new(sink),
        &MassChangeConfig::default(),
    )
    .unwrap();

    fs::write(&a, "encrypted").unwrap();

    let alert = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match alerts.recv().await {
                Some(alert) if alert.kind == AlertKind::Modified => break alert,
                Some(_) => continue,
                None => panic!("sink closed"),
            }
        }
    })
    .await
    .expect("no modified alert from the notify backend");
    assert_eq!(alert.path, Some(key(&a)));

    tokio::time::timeout(Duration::from_secs(5), monitor.stop())
        .await
        .expect("monitor did not stop");
}
