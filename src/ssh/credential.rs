// ABOUTME: Transient private-key file scoped to one remote-access step.
// ABOUTME: Created with mode 0600 and removed on drop, whatever the outcome.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::Secret;

/// A private key written to disk for the lifetime of this guard.
#[derive(Debug)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    /// Write the key into the system temp directory.
    pub fn write(key: &Secret) -> std::io::Result<Self> {
        Self::write_in(&std::env::temp_dir(), key)
    }

    /// Write the key into `dir` with owner-only permissions.
    pub fn write_in(dir: &Path, key: &Secret) -> std::io::Result<Self> {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = dir.join(format!("caravel-key-{}-{}", std::process::id(), count));

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path)?;

        // From here on the guard owns the path, so a failed write still cleans up.
        let guard = Self { path };

        let material = key.expose();
        file.write_all(material.as_bytes())?;
        if !material.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.sync_all()?;

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CredentialFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("removed transient credential file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to remove credential file: {}", e),
        }
    }
}
