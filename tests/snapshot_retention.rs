// ABOUTME: Snapshot retention tests.
// ABOUTME: Property tests for expiry selection and a bounded history on the local machine.

mod support;

use caravel::config::Config;
use caravel::host::LocalHost;
use caravel::snapshot::{SnapshotManager, select_expired};
use caravel::types::SnapshotId;
use chrono::{TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use std::path::Path;

fn id(offset_ms: i64) -> SnapshotId {
    let base = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    SnapshotId::at(base + TimeDelta::milliseconds(offset_ms))
}

fn config(root: &Path) -> Config {
    let mut config = Config::template();
    config.remote.root = root.to_str().unwrap().to_string();
    config
}

proptest! {
    #[test]
    fn expiry_keeps_the_newest(
        offsets in prop::collection::vec(0i64..100_000, 0..40),
        retain in 1usize..10,
    ) {
        let ids: Vec<SnapshotId> = offsets.iter().copied().map(id).collect();
        let expired = select_expired(&ids, retain);

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        let kept: Vec<_> = unique.iter().filter(|i| !expired.contains(i)).collect();

        prop_assert!(kept.len() <= retain);
        prop_assert_eq!(kept.len(), unique.len().min(retain));
        if let Some(newest) = unique.last() {
            prop_assert!(!expired.contains(newest));
        }
        prop_assert!(expired.windows(2).all(|w| w[0] < w[1]));
        if let (Some(last_expired), Some(first_kept)) = (expired.last(), kept.first()) {
            prop_assert!(last_expired < *first_kept);
        }
    }
}

#[tokio::test]
async fn history_is_bounded_by_retention() {
    support::init_tracing();
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("dist")).unwrap();
    std::fs::write(root.path().join("package.json"), "{}").unwrap();

    let config = config(root.path());
    let host = LocalHost::default();
    let manager = SnapshotManager::new(&host, &config);

    let mut created = Vec::new();
    for _ in 0..7 {
        created.push(manager.create_snapshot().await.unwrap().unwrap());
    }

    let remaining: Vec<SnapshotId> = manager.list().await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(remaining.len(), 5);
    assert_eq!(
        support::count_snapshots(&root.path().join("backups")),
        5
    );
    // Newest first, and exactly the five most recent survive.
    let mut newest: Vec<SnapshotId> = created[2..].to_vec();
    newest.reverse();
    assert_eq!(remaining, newest);
}

#[tokio::test]
async fn nothing_deployed_means_no_snapshot() {
    let root = tempfile::tempdir().unwrap();
    let config = config(root.path());
    let host = LocalHost::default();
    let manager = SnapshotManager::new(&host, &config);

    assert_eq!(manager.create_snapshot().await.unwrap(), None);
    assert!(manager.list().await.unwrap().is_empty());
    assert_eq!(manager.restore_latest().await.unwrap(), None);
}

#[tokio::test]
async fn rollback_restores_non_default_build_output() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::from_yaml(&format!(
        "app: shop\nremote:\n  root: {}\n  sudo: false\nbuild:\n  output_dir: build\n  include: [build, package.json]\n",
        root.path().display()
    ))
    .unwrap();
    std::fs::create_dir(root.path().join("build")).unwrap();
    std::fs::write(root.path().join("build/app.js"), "good").unwrap();
    std::fs::write(root.path().join("package.json"), "{}").unwrap();

    let host = LocalHost::default();
    let manager = SnapshotManager::new(&host, &config);
    let id = manager.create_snapshot().await.unwrap().unwrap();
    std::fs::write(root.path().join("build/app.js"), "bad").unwrap();

    assert_eq!(manager.restore_latest().await.unwrap(), Some(id));
    assert_eq!(
        std::fs::read_to_string(root.path().join("build/app.js")).unwrap(),
        "good"
    );
}
