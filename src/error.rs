// ABOUTME: Application-wide error types for caravel.
// ABOUTME: Uses thiserror to aggregate configuration, build, transport, and pipeline failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::artifact::BuildError;
use crate::deploy::{DeployError, RollbackError};
use crate::host::HostError;
use crate::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("rollback failed: {0}")]
    Rollback(#[from] RollbackError),

    #[error("no snapshot available to roll back to")]
    NoSnapshot,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
