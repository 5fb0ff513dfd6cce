// ABOUTME: Transport-level error type shared by every RemoteHost implementation.
// ABOUTME: Wraps SSH failures, local I/O failures, timeouts, and rejected uploads.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Ssh(#[from] crate::ssh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command timed out after {0:?}")]
    CommandTimeout(Duration),

    #[error("upload to {remote} rejected: {reason}")]
    UploadRejected { remote: String, reason: String },
}
