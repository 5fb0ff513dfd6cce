// ABOUTME: Snapshot manager error type.
// ABOUTME: Creation failures are tolerated by the release controller; restore failures are not.

use thiserror::Error;

use crate::host::{HostError, ScriptError};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to inspect deployed state: {0}")]
    Inspect(#[from] HostError),

    #[error("snapshot {operation} failed: {source}")]
    Step {
        operation: &'static str,
        #[source]
        source: ScriptError,
    },
}
