// ABOUTME: Artifact build error types with SNAFU pattern.
// ABOUTME: Every variant is fatal and stops the pipeline before anything leaves the machine.

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BuildError {
    #[snafu(display("failed to start build command: {source}"))]
    Spawn { source: std::io::Error },

    #[snafu(display("build command exited with code {code}: {stderr}"))]
    CommandFailed { code: i32, stderr: String },

    #[snafu(display("build output directory {} not found", path.display()))]
    MissingOutput { path: PathBuf },

    #[snafu(display("required path {path} not found in source tree"))]
    MissingPath { path: String },

    #[snafu(display("failed to encode release record: {source}"))]
    Record { source: serde_json::Error },

    #[snafu(display("failed to write artifact {}: {source}", path.display()))]
    Package {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("packaging task failed: {source}"))]
    Task { source: tokio::task::JoinError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// The build command could not run or exited non-zero.
    Command,
    /// Expected files were absent from the source tree.
    MissingInput,
    /// Writing the bundle failed.
    Packaging,
}

impl BuildError {
    pub fn kind(&self) -> BuildErrorKind {
        match self {
            BuildError::Spawn { .. } | BuildError::CommandFailed { .. } => BuildErrorKind::Command,
            BuildError::MissingOutput { .. } | BuildError::MissingPath { .. } => {
                BuildErrorKind::MissingInput
            }
            BuildError::Record { .. } | BuildError::Package { .. } | BuildError::Task { .. } => {
                BuildErrorKind::Packaging
            }
        }
    }
}
