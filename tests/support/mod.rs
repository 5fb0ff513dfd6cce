// ABOUTME: Test support utilities.
// ABOUTME: Fake supervisor, scripted health probe, counting connector, and project fixtures.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use caravel::config::Config;
use caravel::health::HttpProbe;
use caravel::host::{Connector, HostError, LocalConnector, LocalHost, RemoteHost};
use caravel::supervisor::{ProcessPresence, Supervisor, SupervisorError};
use caravel::types::ProcessName;
use nonempty::nonempty;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("caravel=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Supervisor that remembers which processes it started.
#[derive(Default)]
pub struct FakeSupervisor {
    known: Mutex<bool>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeSupervisor {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Supervisor for FakeSupervisor {
    async fn describe(
        &self,
        _host: &dyn RemoteHost,
        _name: &ProcessName,
    ) -> Result<ProcessPresence, SupervisorError> {
        self.calls.lock().push("describe");
        Ok(if *self.known.lock() {
            ProcessPresence::Present
        } else {
            ProcessPresence::Absent
        })
    }

    async fn start(
        &self,
        _host: &dyn RemoteHost,
        _name: &ProcessName,
    ) -> Result<(), SupervisorError> {
        self.calls.lock().push("start");
        *self.known.lock() = true;
        Ok(())
    }

    async fn reload(
        &self,
        _host: &dyn RemoteHost,
        _name: &ProcessName,
        _update_env: bool,
    ) -> Result<(), SupervisorError> {
        self.calls.lock().push("reload");
        Ok(())
    }

    async fn save(&self, _host: &dyn RemoteHost) -> Result<(), SupervisorError> {
        self.calls.lock().push("save");
        Ok(())
    }
}

/// Probe answering from a queue of statuses; 000 once the queue runs dry.
#[derive(Default)]
pub struct ScriptedProbe {
    statuses: Mutex<VecDeque<u16>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn push(&self, statuses: &[u16]) {
        self.statuses.lock().extend(statuses.iter().copied());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn probe(&self, _url: &str) -> u16 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.statuses.lock().pop_front().unwrap_or(0)
    }
}

/// Local connector that counts sessions.
#[derive(Default)]
pub struct CountingConnector {
    inner: LocalConnector,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl CountingConnector {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for CountingConnector {
    type Host = LocalHost;

    async fn connect(&self) -> Result<LocalHost, HostError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.inner.connect().await
    }

    async fn disconnect(&self, host: LocalHost) -> Result<(), HostError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.inner.disconnect(host).await
    }
}

/// A source tree and a target root in temporary directories.
pub struct Project {
    pub source: tempfile::TempDir,
    pub target: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            source: tempfile::tempdir().unwrap(),
            target: tempfile::tempdir().unwrap(),
        };
        let src = project.source.path();
        std::fs::write(src.join("package.json"), r#"{"name":"shop"}"#).unwrap();
        std::fs::write(src.join("package-lock.json"), r#"{"lockfileVersion":3}"#).unwrap();
        std::fs::write(src.join("ecosystem.config.js"), "module.exports = {};\n").unwrap();
        std::fs::create_dir_all(project.uploads()).unwrap();
        project.set_version("v1");
        project
    }

    /// Content the next build copies into the output directory.
    pub fn set_version(&self, version: &str) {
        std::fs::write(self.source.path().join("VERSION"), version).unwrap();
    }

    pub fn root(&self) -> PathBuf {
        self.target.path().join("srv/shop")
    }

    pub fn uploads(&self) -> PathBuf {
        self.target.path().join("uploads")
    }

    pub fn deployed_version(&self) -> String {
        std::fs::read_to_string(self.root().join("dist/VERSION")).unwrap()
    }

    pub fn read_root(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root().join(relative)).unwrap()
    }

    pub fn snapshot_count(&self) -> usize {
        count_snapshots(&self.root().join("backups"))
    }

    /// Configuration targeting the local machine with zero health-check delays.
    pub fn config(&self) -> Config {
        let mut config = Config::template();
        config.app = ProcessName::new("shop").unwrap();
        config.remote.root = self.root().to_str().unwrap().to_string();
        config.remote.upload_dir = self.uploads().to_str().unwrap().to_string();
        config.remote.sudo = false;
        config.build.command = "mkdir -p dist && cp VERSION dist/VERSION".to_string();
        config.build.include = nonempty![
            "dist".to_string(),
            "package.json".to_string(),
            "package-lock.json".to_string(),
            "ecosystem.config.js".to_string()
        ];
        config.install.command = "echo installed >> install.log".to_string();
        config.healthcheck.url = Some("http://127.0.0.1:9/".to_string());
        config.healthcheck.settle = Duration::ZERO;
        config.healthcheck.interval = Duration::ZERO;
        config
    }
}

pub fn count_snapshots(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.starts_with("backup-") && name.ends_with(".tar.gz")
            })
            .count(),
        Err(_) => 0,
    }
}
