// ABOUTME: Creates, lists, prunes, and restores snapshot archives over a RemoteHost.
// ABOUTME: Archives live in the backups directory below the deployed root.

use super::SnapshotError;
use super::retention::select_expired;
use crate::config::{Config, RemoteConfig};
use crate::host::{RemoteHost, Script, quote};
use crate::types::SnapshotId;

/// A snapshot archive present on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub id: SnapshotId,
    /// Absolute path of the archive on the host.
    pub path: String,
}

pub struct SnapshotManager<'a, H: RemoteHost + ?Sized> {
    host: &'a H,
    remote: &'a RemoteConfig,
    /// Root-relative path whose presence marks a previous deployment.
    marker: &'a str,
    members: Vec<String>,
}

impl<'a, H: RemoteHost + ?Sized> SnapshotManager<'a, H> {
    pub fn new(host: &'a H, config: &'a Config) -> Self {
        Self {
            host,
            remote: &config.remote,
            marker: &config.build.output_dir,
            members: config.snapshot_members(),
        }
    }

    /// All snapshots on the host, newest first.
    pub async fn list(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        let backups = self.remote.backups_path();
        let output = self
            .host
            .exec(&format!(
                "if [ -d {dir} ]; then ls -1 -- {dir}; fi",
                dir = quote(&backups)
            ))
            .await?;

        let mut snapshots: Vec<Snapshot> = output
            .stdout
            .lines()
            .filter_map(|name| SnapshotId::parse_file_name(name.trim()).ok())
            .map(|id| Snapshot {
                path: format!("{}/{}", backups, id.file_name()),
                id,
            })
            .collect();
        snapshots.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(snapshots)
    }

    pub async fn latest(&self) -> Result<Option<Snapshot>, SnapshotError> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Archive the deployed state and apply retention.
    ///
    /// Returns `None` when nothing has been deployed yet.
    pub async fn create_snapshot(&self) -> Result<Option<SnapshotId>, SnapshotError> {
        if !self.host.file_exists(&self.remote.path(self.marker)).await? {
            tracing::info!("no previous deployment found, skipping snapshot");
            return Ok(None);
        }

        let mut present = Vec::new();
        for path in &self.members {
            if self.host.file_exists(&self.remote.path(path)).await? {
                present.push(path.as_str());
            }
        }
        if present.is_empty() {
            tracing::info!("none of the snapshot members exist, skipping snapshot");
            return Ok(None);
        }

        let existing = self.list().await?;
        let now = SnapshotId::now();
        let id = match existing.first() {
            Some(latest) if latest.id >= now => latest.id.successor(),
            _ => now,
        };

        let backups = self.remote.backups_path();
        let archive = format!("{}/{}", backups, id.file_name());
        let partial = format!("{archive}.partial");
        let members: Vec<String> = present.iter().map(|p| quote(p)).collect();

        let script = Script::new()
            .step("create backup directory", format!("mkdir -p {}", quote(&backups)))
            .step(
                "archive deployed state",
                format!(
                    "cd {} && tar -czf {} -- {}",
                    quote(&self.remote.root),
                    quote(&partial),
                    members.join(" ")
                ),
            )
            .step(
                "publish snapshot",
                format!("mv -f {} {}", quote(&partial), quote(&archive)),
            );

        if let Err(source) = script.run(self.host).await {
            let _ = self.host.exec(&format!("rm -f {}", quote(&partial))).await;
            return Err(SnapshotError::Step {
                operation: "create",
                source,
            });
        }
        tracing::info!(snapshot = %id, "snapshot created");

        let mut ids: Vec<SnapshotId> = existing.iter().map(|s| s.id).collect();
        ids.push(id);
        self.prune(&ids).await?;

        Ok(Some(id))
    }

    async fn prune(&self, ids: &[SnapshotId]) -> Result<(), SnapshotError> {
        let expired = select_expired(ids, self.remote.retain_snapshots);
        if expired.is_empty() {
            return Ok(());
        }

        let backups = self.remote.backups_path();
        let script = expired.iter().fold(Script::new(), |script, id| {
            let path = format!("{}/{}", backups, id.file_name());
            script.step(format!("delete {id}"), format!("rm -f {}", quote(&path)))
        });
        script
            .run(self.host)
            .await
            .map_err(|source| SnapshotError::Step {
                operation: "retention",
                source,
            })?;

        tracing::debug!(deleted = expired.len(), "expired snapshots removed");
        Ok(())
    }

    /// Extract the newest snapshot over the deployed root.
    ///
    /// Returns `None` (and touches nothing) when no snapshot exists.
    pub async fn restore_latest(&self) -> Result<Option<SnapshotId>, SnapshotError> {
        let Some(latest) = self.latest().await? else {
            tracing::warn!("no snapshot available to restore");
            return Ok(None);
        };

        Script::new()
            .step(
                "extract snapshot",
                format!(
                    "tar -xzf {} -C {} --overwrite",
                    quote(&latest.path),
                    quote(&self.remote.root)
                ),
            )
            .run(self.host)
            .await
            .map_err(|source| SnapshotError::Step {
                operation: "restore",
                source,
            })?;

        tracing::info!(snapshot = %latest.id, "snapshot restored");
        Ok(Some(latest.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;
    use std::path::Path;

    fn config(root: &Path) -> Config {
        let mut config = Config::template();
        config.remote.root = root.to_str().unwrap().to_string();
        config.remote.retain_snapshots = 2;
        config
    }

    #[tokio::test]
    async fn first_deploy_skips_snapshot() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        let host = LocalHost::default();

        let manager = SnapshotManager::new(&host, &config);
        assert_eq!(manager.create_snapshot().await.unwrap(), None);
        assert!(!root.path().join("backups").exists());
    }

    #[tokio::test]
    async fn snapshots_are_ordered_and_retained() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("dist")).unwrap();
        std::fs::write(root.path().join("dist/app.js"), "v1").unwrap();
        let config = config(root.path());
        let host = LocalHost::default();
        let manager = SnapshotManager::new(&host, &config);

        let mut created = Vec::new();
        for _ in 0..3 {
            created.push(manager.create_snapshot().await.unwrap().unwrap());
        }

        assert!(created.windows(2).all(|w| w[0] < w[1]));

        let listed: Vec<SnapshotId> = manager.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![created[2], created[1]]);
    }

    #[tokio::test]
    async fn restore_brings_back_archived_content() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("dist")).unwrap();
        std::fs::write(root.path().join("dist/app.js"), "good").unwrap();
        let config = config(root.path());
        let host = LocalHost::default();
        let manager = SnapshotManager::new(&host, &config);

        let id = manager.create_snapshot().await.unwrap().unwrap();
        std::fs::write(root.path().join("dist/app.js"), "bad").unwrap();

        assert_eq!(manager.restore_latest().await.unwrap(), Some(id));
        assert_eq!(
            std::fs::read_to_string(root.path().join("dist/app.js")).unwrap(),
            "good"
        );
    }

    #[tokio::test]
    async fn restore_without_snapshot_changes_nothing() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("dist")).unwrap();
        std::fs::write(root.path().join("dist/app.js"), "current").unwrap();
        let config = config(root.path());
        let host = LocalHost::default();

        let manager = SnapshotManager::new(&host, &config);
        assert_eq!(manager.restore_latest().await.unwrap(), None);
        assert_eq!(
            std::fs::read_to_string(root.path().join("dist/app.js")).unwrap(),
            "current"
        );
    }

    #[tokio::test]
    async fn snapshot_follows_configured_layout() {
        let root = tempfile::tempdir().unwrap();
        let mut config = config(root.path());
        config.build.output_dir = "build".to_string();
        config.supervisor.ecosystem = "ecosystem.config.cjs".to_string();
        config.remote.env_file = "config/app.env".to_string();
        config.remote.snapshot_paths = vec![];
        std::fs::create_dir_all(root.path().join("build")).unwrap();
        std::fs::create_dir_all(root.path().join("config")).unwrap();
        std::fs::write(root.path().join("build/app.js"), "good").unwrap();
        std::fs::write(root.path().join("ecosystem.config.cjs"), "good").unwrap();
        std::fs::write(root.path().join("config/app.env"), "PORT=1\n").unwrap();
        let host = LocalHost::default();
        let manager = SnapshotManager::new(&host, &config);

        let id = manager.create_snapshot().await.unwrap().unwrap();
        std::fs::write(root.path().join("build/app.js"), "bad").unwrap();
        std::fs::write(root.path().join("ecosystem.config.cjs"), "bad").unwrap();
        std::fs::write(root.path().join("config/app.env"), "PORT=2\n").unwrap();

        assert_eq!(manager.restore_latest().await.unwrap(), Some(id));
        let read = |p: &str| std::fs::read_to_string(root.path().join(p)).unwrap();
        assert_eq!(read("build/app.js"), "good");
        assert_eq!(read("ecosystem.config.cjs"), "good");
        assert_eq!(read("config/app.env"), "PORT=1\n");
    }
}
