// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a snapshot creation warning.
    pub fn snapshot_create(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SnapshotCreate,
            message: message.into(),
        }
    }

    /// Create a warning for a rollback that found nothing to restore.
    pub fn rollback_no_snapshot(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RollbackNoSnapshot,
            message: message.into(),
        }
    }

    /// Create an SSH disconnect warning.
    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Snapshot of the previous release failed; the deploy continued without one.
    SnapshotCreate,
    /// Rollback was requested but the host had no snapshot.
    RollbackNoSnapshot,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
}
