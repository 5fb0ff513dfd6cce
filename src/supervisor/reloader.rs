// ABOUTME: Start-or-reload state machine for the single supervised process.
// ABOUTME: Re-queries the supervisor on every call and tracks the observable process state.

use parking_lot::Mutex;

use super::{ProcessPresence, Supervisor, SupervisorError};
use crate::host::RemoteHost;
use crate::types::ProcessName;

/// Lifecycle of the supervised process as seen by the reloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Absent,
    Starting,
    Running,
    Reloading,
    Failed,
}

/// Which transition `ensure_running` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Started,
    Reloaded,
}

impl std::fmt::Display for ReloadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReloadOutcome::Started => write!(f, "started"),
            ReloadOutcome::Reloaded => write!(f, "reloaded"),
        }
    }
}

pub struct ProcessReloader<S> {
    supervisor: S,
    state: Mutex<ProcessState>,
}

impl<S: Supervisor> ProcessReloader<S> {
    pub fn new(supervisor: S) -> Self {
        Self {
            supervisor,
            state: Mutex::new(ProcessState::Absent),
        }
    }

    /// Last observed state of the process.
    pub fn state(&self) -> ProcessState {
        *self.state.lock()
    }

    pub fn supervisor(&self) -> &S {
        &self.supervisor
    }

    /// Reload the process if the supervisor knows it, start it otherwise, then save.
    pub async fn ensure_running(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
    ) -> Result<ReloadOutcome, SupervisorError> {
        let presence = self.supervisor.describe(host, name).await;
        let presence = self.track(presence)?;
        tracing::debug!(process = %name, ?presence, "supervisor describe");

        let outcome = match presence {
            ProcessPresence::Present => {
                self.set(ProcessState::Reloading);
                let reloaded = self.supervisor.reload(host, name, true).await;
                self.track(reloaded)?;
                ReloadOutcome::Reloaded
            }
            ProcessPresence::Absent => {
                self.set(ProcessState::Starting);
                let started = self.supervisor.start(host, name).await;
                self.track(started)?;
                ReloadOutcome::Started
            }
        };
        self.set(ProcessState::Running);

        let saved = self.supervisor.save(host).await;
        self.track(saved)?;
        tracing::info!(process = %name, %outcome, "process up");
        Ok(outcome)
    }

    /// Reload without the start fallback, for restoring a previous release.
    pub async fn reload(
        &self,
        host: &dyn RemoteHost,
        name: &ProcessName,
    ) -> Result<(), SupervisorError> {
        self.set(ProcessState::Reloading);
        let reloaded = self.supervisor.reload(host, name, true).await;
        self.track(reloaded)?;
        self.set(ProcessState::Running);

        let saved = self.supervisor.save(host).await;
        self.track(saved)
    }

    fn set(&self, state: ProcessState) {
        *self.state.lock() = state;
    }

    fn track<T>(&self, result: Result<T, SupervisorError>) -> Result<T, SupervisorError> {
        if result.is_err() {
            self.set(ProcessState::Failed);
        }
        result
    }
}
