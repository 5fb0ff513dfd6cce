// ABOUTME: Validated domain types shared across the deployment pipeline.
// ABOUTME: Process names, artifact versions, snapshot ids, and redacted secrets.

mod process_name;
mod secret;
mod snapshot_id;
mod version;

pub use process_name::{ProcessName, ProcessNameError};
pub use secret::Secret;
pub use snapshot_id::{SnapshotId, SnapshotIdError};
pub use version::ArtifactVersion;
