// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the data produced by the transitions that led to it.

use crate::artifact::Artifact;
use crate::release::ReleaseReport;
use crate::supervisor::ReloadOutcome;

/// Initial state: configuration loaded, nothing built yet.
/// Available actions: `build()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Artifact packaged on the local disk.
/// Available actions: `deliver()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) artifact: Artifact,
}

/// Artifact uploaded to the host.
/// Available actions: `release()`
#[derive(Debug, Clone)]
pub struct Delivered {
    pub(crate) artifact: Artifact,
    pub(crate) remote_archive: String,
}

/// New release extracted and installed in the deployed root.
/// Available actions: `reload()`
#[derive(Debug, Clone)]
pub struct Released {
    pub(crate) artifact: Artifact,
    pub(crate) report: ReleaseReport,
}

/// Process started or reloaded on the new release.
/// Available actions: `verify()`, `rollback()`
#[derive(Debug, Clone)]
pub struct Reloaded {
    pub(crate) artifact: Artifact,
    pub(crate) report: ReleaseReport,
    pub(crate) outcome: ReloadOutcome,
}

/// Health verification passed.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Verified {
    pub(crate) artifact: Artifact,
    pub(crate) report: ReleaseReport,
    pub(crate) outcome: ReloadOutcome,
    pub(crate) status: u16,
}
