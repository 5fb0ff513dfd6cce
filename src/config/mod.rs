// ABOUTME: Configuration types and parsing for caravel.yml.
// ABOUTME: Handles YAML parsing, defaults, validation, and env-sourced secrets.

mod build;
mod env_value;
mod healthcheck;
mod init;
mod remote;
mod server;
mod supervisor;

pub use build::BuildConfig;
pub use env_value::EnvValue;
pub use healthcheck::HealthcheckConfig;
pub use init::init_config;
pub use remote::{InstallConfig, RemoteConfig};
pub use server::{HOST_ENV, KEY_ENV, ResolvedServer, ServerConfig, USER_ENV};
pub use supervisor::SupervisorConfig;

use crate::error::{Error, Result};
use crate::types::{ProcessName, Secret};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "caravel.yml";
pub const CONFIG_FILENAME_ALT: &str = "caravel.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".caravel/config.yml";

/// Directory names that hold development-only dependencies and are never shipped.
const DEV_DEPENDENCY_DIRS: &[&str] = &["node_modules"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_process_name")]
    pub app: ProcessName,

    #[serde(default)]
    pub server: ServerConfig,

    pub remote: RemoteConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub supervisor: SupervisorConfig,

    #[serde(default)]
    pub healthcheck: HealthcheckConfig,

    /// Written to the environment file on first deploy only.
    #[serde(default = "default_env_defaults")]
    pub env_defaults: BTreeMap<String, String>,
}

fn default_env_defaults() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("NODE_ENV".to_string(), "production".to_string()),
        ("PORT".to_string(), "8000".to_string()),
    ])
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let root = self.remote.root.trim_end_matches('/');
        if !self.remote.root.starts_with('/') || root.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "remote.root must be an absolute path below /, got {:?}",
                self.remote.root
            )));
        }

        if self.remote.retain_snapshots == 0 {
            return Err(Error::InvalidConfig(
                "remote.retain_snapshots must be at least 1".to_string(),
            ));
        }

        if self.healthcheck.attempts == 0 {
            return Err(Error::InvalidConfig(
                "healthcheck.attempts must be at least 1".to_string(),
            ));
        }

        if self.healthcheck.accept.is_empty() {
            return Err(Error::InvalidConfig(
                "healthcheck.accept must list at least one status code".to_string(),
            ));
        }

        let relative = self
            .build
            .include
            .iter()
            .chain(&self.build.optional)
            .chain(&self.remote.snapshot_paths)
            .chain(&self.install.lockfile)
            .chain([
                &self.build.output_dir,
                &self.remote.backups_dir,
                &self.remote.env_file,
                &self.remote.logs_dir,
                &self.supervisor.ecosystem,
            ]);
        for path in relative {
            check_relative(path)?;
        }

        if let Some(dev) = self
            .build
            .include
            .iter()
            .chain(&self.build.optional)
            .find(|p| DEV_DEPENDENCY_DIRS.contains(&p.trim_end_matches('/')))
        {
            return Err(Error::InvalidConfig(format!(
                "{dev} holds development dependencies and cannot be packaged"
            )));
        }

        Ok(())
    }

    /// Root-relative paths archived by each snapshot, without duplicates.
    ///
    /// The build output, process configuration and environment file are always
    /// members, whatever `remote.snapshot_paths` lists.
    pub fn snapshot_members(&self) -> Vec<String> {
        let mut members: Vec<String> = Vec::new();
        let required = [
            Some(&self.build.output_dir),
            Some(&self.supervisor.ecosystem),
            Some(&self.remote.env_file),
            self.install.lockfile.as_ref(),
        ];
        for path in required
            .into_iter()
            .flatten()
            .chain(&self.remote.snapshot_paths)
        {
            let path = path.trim_end_matches('/');
            if !members.iter().any(|m| m == path) {
                members.push(path.to_string());
            }
        }
        members
    }

    /// Health endpoint, defaulting to the public address of the target host.
    pub fn health_url(&self, host: &Secret) -> String {
        self.healthcheck
            .url
            .clone()
            .unwrap_or_else(|| format!("http://{}/", host.expose()))
    }

    pub fn template() -> Self {
        Config {
            app: ProcessName::new("my-app").expect("template name is valid"),
            server: ServerConfig::default(),
            remote: RemoteConfig::new("/var/www/my-app"),
            build: BuildConfig::default(),
            install: InstallConfig::default(),
            supervisor: SupervisorConfig::default(),
            healthcheck: HealthcheckConfig::default(),
            env_defaults: default_env_defaults(),
        }
    }
}

fn check_relative(path: &str) -> Result<()> {
    let p = Path::new(path);
    if path.is_empty()
        || p.is_absolute()
        || p.components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(Error::InvalidConfig(format!(
            "{path:?} must be a relative path inside the project"
        )));
    }
    if path.contains(|c: char| c == '\'' || c == '\n') {
        return Err(Error::InvalidConfig(format!(
            "{path:?} contains unsupported characters"
        )));
    }
    Ok(())
}

fn deserialize_process_name<'de, D>(deserializer: D) -> std::result::Result<ProcessName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ProcessName::new(&s).map_err(serde::de::Error::custom)
}
