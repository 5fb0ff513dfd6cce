// ABOUTME: Snapshot manager for the deployed state on the target host.
// ABOUTME: Creates timestamped archives, keeps the newest N, and restores the latest.

mod error;
mod manager;
mod retention;

pub use error::SnapshotError;
pub use manager::{Snapshot, SnapshotManager};
pub use retention::select_expired;
