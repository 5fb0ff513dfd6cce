// ABOUTME: Error types for deployment operations.
// ABOUTME: One variant per pipeline stage plus the two outcomes of a failed health check.

use thiserror::Error;

use super::rollback::{RollbackError, RollbackOutcome};
use crate::artifact::BuildError;
use crate::health::HealthCheckFailure;
use crate::host::HostError;
use crate::release::ReleaseError;
use crate::supervisor::SupervisorError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Build failed; nothing left the machine.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    /// Connecting, uploading, or disconnecting failed.
    #[error("transport failed: {0}")]
    Transport(#[from] HostError),

    /// A release step failed on the host.
    #[error("release failed: {0}")]
    Release(#[from] ReleaseError),

    /// The supervisor could not start or reload the process.
    #[error("process reload failed: {0}")]
    Reload(#[from] SupervisorError),

    /// Health verification failed; rollback has not run yet.
    #[error(transparent)]
    HealthCheck(#[from] HealthCheckFailure),

    /// Health verification failed and rollback completed.
    #[error("{failure}; {outcome}")]
    RolledBack {
        failure: HealthCheckFailure,
        outcome: RollbackOutcome,
    },

    /// Health verification failed and rollback failed too.
    #[error("{failure}; rollback failed: {source}")]
    Rollback {
        failure: HealthCheckFailure,
        #[source]
        source: RollbackError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Build,
    Transport,
    Release,
    Reload,
    HealthCheck,
    RolledBack,
    RollbackFailed,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Build(_) => DeployErrorKind::Build,
            DeployError::Transport(_) => DeployErrorKind::Transport,
            DeployError::Release(_) => DeployErrorKind::Release,
            DeployError::Reload(_) => DeployErrorKind::Reload,
            DeployError::HealthCheck(_) => DeployErrorKind::HealthCheck,
            DeployError::RolledBack { .. } => DeployErrorKind::RolledBack,
            DeployError::Rollback { .. } => DeployErrorKind::RollbackFailed,
        }
    }

    /// True once the live release may have changed.
    pub fn is_post_release(&self) -> bool {
        matches!(
            self.kind(),
            DeployErrorKind::Reload
                | DeployErrorKind::HealthCheck
                | DeployErrorKind::RolledBack
                | DeployErrorKind::RollbackFailed
        )
    }
}
