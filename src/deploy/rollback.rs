// ABOUTME: Rollback coordinator restoring the latest snapshot and reloading from it.
// ABOUTME: Shared by the automatic path after a failed health check and by manual rollback.

use std::fmt;
use thiserror::Error;

use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::host::{Connector, HostError, RemoteHost};
use crate::release::{ReleaseController, ReleaseError};
use crate::snapshot::{SnapshotError, SnapshotManager};
use crate::supervisor::{ProcessReloader, Supervisor, SupervisorError};
use crate::types::SnapshotId;

#[derive(Debug, Error)]
pub enum RollbackError {
    #[error("could not reconnect to host: {0}")]
    Connect(#[source] HostError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("dependency reinstall failed: {0}")]
    Install(#[from] ReleaseError),

    #[error("reload failed: {0}")]
    Reload(#[from] SupervisorError),
}

/// What a rollback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The snapshot was restored and the process reloaded from it.
    Restored(SnapshotId),
    /// No snapshot existed; the deployed state was left as is.
    NoSnapshot,
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackOutcome::Restored(id) => write!(f, "rolled back to snapshot {id}"),
            RollbackOutcome::NoSnapshot => write!(f, "no snapshot to roll back to"),
        }
    }
}

/// Restore the newest snapshot on `host`, reinstall dependencies, and reload.
pub async fn restore_previous_release<H: RemoteHost, S: Supervisor>(
    config: &Config,
    host: &H,
    reloader: &ProcessReloader<S>,
    diagnostics: &mut Diagnostics,
) -> Result<RollbackOutcome, RollbackError> {
    let snapshots = SnapshotManager::new(host, config);

    let Some(id) = snapshots.restore_latest().await? else {
        diagnostics.warn(Warning::rollback_no_snapshot(
            "no snapshot available, deployed state left unchanged",
        ));
        return Ok(RollbackOutcome::NoSnapshot);
    };

    ReleaseController::new(config)
        .install_dependencies(host)
        .await?;
    reloader.reload(host, &config.app).await?;

    tracing::info!(snapshot = %id, "rollback complete");
    Ok(RollbackOutcome::Restored(id))
}

/// Roll back over a freshly established connection.
pub async fn manual_rollback<C: Connector, S: Supervisor>(
    config: &Config,
    connector: &C,
    reloader: &ProcessReloader<S>,
    diagnostics: &mut Diagnostics,
) -> Result<RollbackOutcome, RollbackError> {
    let host = connector.connect().await.map_err(RollbackError::Connect)?;

    let result = restore_previous_release(config, &host, reloader, diagnostics).await;

    if let Err(e) = connector.disconnect(host).await {
        diagnostics.warn(Warning::ssh_disconnect(format!(
            "disconnect after rollback failed: {e}"
        )));
    }

    result
}
