// ABOUTME: RemoteHost implementation that targets the local machine.
// ABOUTME: Runs commands through `sh -c` and copies files with an atomic rename.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{CommandOutput, Connector, HostError, RemoteHost};

/// The local machine as a deployment target.
#[derive(Debug, Clone)]
pub struct LocalHost {
    command_timeout: Duration,
}

impl LocalHost {
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[async_trait]
impl RemoteHost for LocalHost {
    async fn exec(&self, command: &str) -> Result<CommandOutput, HostError> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.command_timeout, child)
            .await
            .map_err(|_| HostError::CommandTimeout(self.command_timeout))??;

        // Signal-terminated processes have no code; report them like a shell would.
        let exit_code = output
            .status
            .code()
            .map(|c| c as u32)
            .unwrap_or(128);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<(), HostError> {
        let partial = format!("{remote}.partial");
        if let Err(e) = tokio::fs::copy(local, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(HostError::UploadRejected {
                remote: remote.to_string(),
                reason: e.to_string(),
            });
        }
        tokio::fs::rename(&partial, remote).await?;
        Ok(())
    }
}

/// Connector handing out [`LocalHost`] sessions.
#[derive(Debug, Clone, Default)]
pub struct LocalConnector {
    host: LocalHost,
}

impl LocalConnector {
    pub fn new(command_timeout: Duration) -> Self {
        Self {
            host: LocalHost::new(command_timeout),
        }
    }
}

#[async_trait]
impl Connector for LocalConnector {
    type Host = LocalHost;

    async fn connect(&self) -> Result<LocalHost, HostError> {
        Ok(self.host.clone())
    }

    async fn disconnect(&self, _host: LocalHost) -> Result<(), HostError> {
        Ok(())
    }
}
