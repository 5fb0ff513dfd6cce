// ABOUTME: Traits describing what the pipeline needs from a target host.
// ABOUTME: RemoteHost runs commands and uploads files; Connector scopes a host session.

use async_trait::async_trait;
use std::path::Path;

use super::HostError;
use super::script::quote;

/// Output from a command executed on the target host.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Command execution and file delivery on the target host.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Run one shell command, blocking until it exits.
    async fn exec(&self, command: &str) -> Result<CommandOutput, HostError>;

    /// Copy a local file to `remote`. The destination only appears once the
    /// whole file has been written.
    async fn upload(&self, local: &Path, remote: &str) -> Result<(), HostError>;

    /// Check if a file or directory exists on the host.
    async fn file_exists(&self, path: &str) -> Result<bool, HostError> {
        let output = self
            .exec(&format!("test -e {} && echo exists", quote(path)))
            .await?;
        Ok(output.success() && output.stdout.trim() == "exists")
    }
}

/// Opens and closes scoped sessions to the target host.
///
/// Each remote-access step connects, does its work, and disconnects; any
/// per-session resources (credential files) live exactly that long.
#[async_trait]
pub trait Connector: Send + Sync {
    type Host: RemoteHost;

    async fn connect(&self) -> Result<Self::Host, HostError>;

    async fn disconnect(&self, host: Self::Host) -> Result<(), HostError>;
}
