// ABOUTME: Transition primitives the process reloader needs from a supervisor.
// ABOUTME: describe, start, reload, and save against a RemoteHost.

use async_trait::async_trait;
use thiserror::Error;

use crate::host::{CommandOutput, HostError, RemoteHost};
use crate::types::ProcessName;

/// Whether the supervisor currently knows a process by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessPresence {
    Present,
    Absent,
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("supervisor {operation} could not run: {source}")]
    Host {
        operation: &'static str,
        #[source]
        source: HostError,
    },

    #[error("supervisor {operation} exited with code {exit_code}: {stderr}")]
    Failed {
        operation: &'static str,
        exit_code: u32,
        stderr: String,
    },
}

impl SupervisorError {
    /// Turn a finished command into `Ok` or `Failed`.
    pub fn check(operation: &'static str, output: CommandOutput) -> Result<(), Self> {
        if output.success() {
            Ok(())
        } else {
            Err(SupervisorError::Failed {
                operation,
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

/// Process supervisor running on the target host.
#[async_trait]
pub trait Supervisor: Send + Sync {
    async fn describe(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
    ) -> Result<ProcessPresence, SupervisorError>;

    /// Start the process from its process configuration.
    async fn start(&self, host: &dyn RemoteHost, name: &ProcessName)
    -> Result<(), SupervisorError>;

    /// Zero-downtime reload: the old worker keeps serving until the new one is ready.
    async fn reload(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
        update_env: bool,
    ) -> Result<(), SupervisorError>;

    /// Persist the process list so it survives a host reboot.
    async fn save(&self, host: &dyn RemoteHost) -> Result<(), SupervisorError>;
}
