// ABOUTME: Runs the build command and packages the configured paths into a .tar.gz bundle.
// ABOUTME: Writes through a .partial file and prunes old local artifacts afterwards.

use chrono::Utc;
use flate2::Compression;
use flate2::write::GzEncoder;
use snafu::{ResultExt, ensure};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::task::spawn_blocking;

use super::error::{
    BuildError, CommandFailedSnafu, MissingOutputSnafu, MissingPathSnafu, PackageSnafu,
    RecordSnafu, SpawnSnafu, TaskSnafu,
};
use super::record::{RELEASE_RECORD, ReleaseRecord};
use crate::config::BuildConfig;
use crate::types::{ArtifactVersion, ProcessName};

const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// CI variables consulted for the source commit, in order.
const COMMIT_ENV_VARS: &[&str] = &["GITHUB_SHA", "CI_COMMIT_SHA"];

/// A packaged, immutable bundle on the local disk.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub version: ArtifactVersion,
    pub size: u64,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub struct ArtifactBuilder {
    app: ProcessName,
    config: BuildConfig,
}

impl ArtifactBuilder {
    pub fn new(app: ProcessName, config: BuildConfig) -> Self {
        Self { app, config }
    }

    /// Compile `source_dir` and package it.
    pub async fn build(&self, source_dir: &Path) -> Result<Artifact, BuildError> {
        self.run_build_command(source_dir).await?;

        let output_dir = source_dir.join(&self.config.output_dir);
        ensure!(
            output_dir.is_dir(),
            MissingOutputSnafu { path: output_dir }
        );

        let mut entries = Vec::new();
        for path in &self.config.include {
            ensure!(
                source_dir.join(path).exists(),
                MissingPathSnafu { path: path.clone() }
            );
            entries.push(path.clone());
        }
        entries.extend(
            self.config
                .optional
                .iter()
                .filter(|p| source_dir.join(p).exists())
                .cloned(),
        );

        let commit = detect_commit(source_dir).await;
        let version = ArtifactVersion::new(Utc::now(), commit.as_deref());
        let record = ReleaseRecord::new(self.app.as_str(), &version);
        let record = serde_json::to_vec_pretty(&record).context(RecordSnafu)?;

        let artifact_dir = source_dir.join(&self.config.artifact_dir);
        let destination =
            artifact_dir.join(format!("{}-{}{}", self.app, version, ARCHIVE_SUFFIX));

        tracing::info!(version = %version, files = entries.len(), "packaging artifact");

        let source = source_dir.to_path_buf();
        let dest = destination.clone();
        let mtime = version.built_at.timestamp().max(0) as u64;
        let size = spawn_blocking(move || package(&source, &entries, &record, mtime, &dest))
            .await
            .context(TaskSnafu)?
            .context(PackageSnafu {
                path: destination.clone(),
            })?;

        tracing::debug!(size, path = %destination.display(), "artifact written");

        if let Err(e) = prune(&artifact_dir, self.app.as_str(), self.config.keep_artifacts) {
            tracing::warn!("failed to prune old artifacts: {}", e);
        }

        Ok(Artifact {
            path: destination,
            version,
            size,
        })
    }

    async fn run_build_command(&self, source_dir: &Path) -> Result<(), BuildError> {
        let command = self.config.command.trim();
        if command.is_empty() {
            tracing::debug!("no build command configured, packaging as-is");
            return Ok(());
        }

        tracing::info!(command, "running build command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(source_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu)?;

        ensure!(
            output.status.success(),
            CommandFailedSnafu {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );
        Ok(())
    }
}

/// Source commit from CI variables, falling back to git.
pub async fn detect_commit(source_dir: &Path) -> Option<String> {
    for var in COMMIT_ENV_VARS {
        if let Ok(value) = std::env::var(var)
            && !value.trim().is_empty()
        {
            return Some(value.trim().to_string());
        }
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(source_dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!commit.is_empty()).then_some(commit)
}

fn package(
    source: &Path,
    entries: &[String],
    record: &[u8],
    mtime: u64,
    destination: &Path,
) -> std::io::Result<u64> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let partial = partial_path(destination);
    let result = write_archive(source, entries, record, mtime, &partial);
    if let Err(e) = result {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }

    std::fs::rename(&partial, destination)?;
    Ok(std::fs::metadata(destination)?.len())
}

fn write_archive(
    source: &Path,
    entries: &[String],
    record: &[u8],
    mtime: u64,
    path: &Path,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);

    for entry in entries {
        let full = source.join(entry);
        let name = entry.trim_end_matches('/');
        if full.is_dir() {
            builder.append_dir_all(name, &full)?;
        } else {
            builder.append_path_with_name(&full, name)?;
        }
    }

    let mut header = tar::Header::new_gnu();
    header.set_size(record.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    header.set_cksum();
    builder.append_data(&mut header, RELEASE_RECORD, record)?;

    let file = builder.into_inner()?.finish()?;
    file.sync_all()?;
    Ok(())
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Delete all but the `keep` newest artifacts of `app`. The newest is always kept.
fn prune(dir: &Path, app: &str, keep: usize) -> std::io::Result<()> {
    let prefix = format!("{app}-");
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(ARCHIVE_SUFFIX))
        .collect();

    // Versions start with the build timestamp, so names sort chronologically.
    names.sort();
    let excess = names.len().saturating_sub(keep.max(1));
    for name in &names[..excess] {
        tracing::debug!(artifact = %name, "pruning old artifact");
        std::fs::remove_file(dir.join(name))?;
    }
    Ok(())
}
