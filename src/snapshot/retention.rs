// ABOUTME: Retention policy for snapshot archives.
// ABOUTME: Pure selection of the archives to delete, oldest first.

use crate::types::SnapshotId;

/// Snapshots beyond the `retain` newest, ordered oldest first.
pub fn select_expired(ids: &[SnapshotId], retain: usize) -> Vec<SnapshotId> {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted.dedup();
    let excess = sorted.len().saturating_sub(retain);
    sorted.truncate(excess);
    sorted
}
