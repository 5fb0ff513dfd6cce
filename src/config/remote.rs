// ABOUTME: Layout of the deployed state on the target host.
// ABOUTME: Root, backups, environment file, logs, ownership, and dependency install settings.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Live deployed-state directory.
    pub root: String,

    /// Directory the artifact is uploaded to before extraction.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_backups_dir")]
    pub backups_dir: String,

    #[serde(default = "default_env_file")]
    pub env_file: String,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    #[serde(default = "default_retain_snapshots")]
    pub retain_snapshots: usize,

    /// Extra paths (relative to root) captured in each snapshot when present,
    /// on top of the build output, process configuration, environment file and
    /// lockfile.
    #[serde(default = "default_snapshot_paths")]
    pub snapshot_paths: Vec<String>,

    /// `user:group` for ownership normalization. Defaults to the connecting user.
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default = "default_sudo")]
    pub sudo: bool,
}

fn default_upload_dir() -> String {
    "/tmp".to_string()
}

fn default_backups_dir() -> String {
    "backups".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_logs_dir() -> String {
    "logs".to_string()
}

fn default_retain_snapshots() -> usize {
    5
}

fn default_snapshot_paths() -> Vec<String> {
    vec!["package.json".to_string()]
}

fn default_sudo() -> bool {
    true
}

impl RemoteConfig {
    pub fn new(root: impl Into<String>) -> Self {
        RemoteConfig {
            root: root.into(),
            upload_dir: default_upload_dir(),
            backups_dir: default_backups_dir(),
            env_file: default_env_file(),
            logs_dir: default_logs_dir(),
            retain_snapshots: default_retain_snapshots(),
            snapshot_paths: default_snapshot_paths(),
            owner: None,
            sudo: default_sudo(),
        }
    }

    /// Join a root-relative path onto the deployed root.
    pub fn path(&self, relative: &str) -> String {
        format!("{}/{}", self.root.trim_end_matches('/'), relative)
    }

    pub fn backups_path(&self) -> String {
        self.path(&self.backups_dir)
    }

    pub fn env_file_path(&self) -> String {
        self.path(&self.env_file)
    }

    pub fn logs_path(&self) -> String {
        self.path(&self.logs_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    /// Lockfile-strict install of runtime dependencies, run in the root.
    #[serde(default = "default_install_command")]
    pub command: String,

    /// Lockfile that must be present before installing.
    #[serde(default = "default_lockfile")]
    pub lockfile: Option<String>,
}

fn default_install_command() -> String {
    "npm ci --omit=dev".to_string()
}

fn default_lockfile() -> Option<String> {
    Some("package-lock.json".to_string())
}

impl Default for InstallConfig {
    fn default() -> Self {
        InstallConfig {
            command: default_install_command(),
            lockfile: default_lockfile(),
        }
    }
}
