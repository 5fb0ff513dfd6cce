// ABOUTME: Release steps run on the target host after the artifact was uploaded.
// ABOUTME: Ownership, snapshot, extract, install, first-deploy environment file, logs.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::{Config, InstallConfig, RemoteConfig};
use crate::diagnostics::{Diagnostics, Warning};
use crate::host::{RemoteHost, Script, ScriptError, quote};
use crate::snapshot::SnapshotManager;
use crate::types::SnapshotId;

/// Output markers of the guarded environment-file write.
const ENV_CREATED: &str = "created";
const ENV_EXISTS: &str = "exists";

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("release step failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: ScriptError,
    },
}

impl From<ScriptError> for ReleaseError {
    fn from(source: ScriptError) -> Self {
        ReleaseError::StepFailed {
            step: source.step().to_string(),
            source,
        }
    }
}

impl ReleaseError {
    pub fn step(&self) -> &str {
        match self {
            ReleaseError::StepFailed { step, .. } => step,
        }
    }
}

/// What a successful release did besides replacing the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Snapshot of the previous release, if one existed and could be archived.
    pub snapshot: Option<SnapshotId>,
    /// Whether this release wrote the environment file (first deploy).
    pub env_created: bool,
}

pub struct ReleaseController<'a> {
    config: &'a Config,
    remote: &'a RemoteConfig,
    install: &'a InstallConfig,
    env_defaults: &'a BTreeMap<String, String>,
}

impl<'a> ReleaseController<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            remote: &config.remote,
            install: &config.install,
            env_defaults: &config.env_defaults,
        }
    }

    /// Apply the uploaded archive at `archive` (a path on the host).
    pub async fn release<H: RemoteHost + ?Sized>(
        &self,
        host: &H,
        archive: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ReleaseReport, ReleaseError> {
        let root = quote(&self.remote.root);

        Script::new()
            .step("prepare root", self.privileged(&format!("mkdir -p {root}")))
            .step("normalize ownership", self.chown())
            .run(host)
            .await?;

        let snapshot = match SnapshotManager::new(host, self.config)
            .create_snapshot()
            .await
        {
            Ok(id) => id,
            Err(e) => {
                diagnostics.warn(Warning::snapshot_create(format!(
                    "snapshot of previous release failed, continuing without one: {e}"
                )));
                None
            }
        };

        Script::new()
            .step(
                "extract artifact",
                format!("tar -xzf {} -C {root} --overwrite", quote(archive)),
            )
            .step("remove uploaded artifact", format!("rm -f {}", quote(archive)))
            .step("normalize ownership", self.chown())
            .run(host)
            .await?;

        self.install_dependencies(host).await?;

        let env_created = self.write_env_file(host).await?;
        if env_created {
            tracing::info!("environment file created with defaults");
        } else {
            tracing::debug!("environment file already present, left untouched");
        }

        Script::new()
            .step(
                "ensure logs directory",
                format!("mkdir -p {}", quote(&self.remote.logs_path())),
            )
            .run(host)
            .await?;

        Ok(ReleaseReport {
            snapshot,
            env_created,
        })
    }

    /// Lockfile-strict install of runtime dependencies in the deployed root.
    pub async fn install_dependencies<H: RemoteHost + ?Sized>(
        &self,
        host: &H,
    ) -> Result<(), ReleaseError> {
        let mut script = Script::new();
        if let Some(ref lockfile) = self.install.lockfile {
            script = script.step(
                "check lockfile",
                format!("test -f {}", quote(&self.remote.path(lockfile))),
            );
        }
        script
            .step(
                "install dependencies",
                format!(
                    "cd {} && {}",
                    quote(&self.remote.root),
                    self.install.command
                ),
            )
            .run(host)
            .await?;
        Ok(())
    }

    /// Create the environment file with defaults unless it already exists.
    ///
    /// `set -C` makes the redirect fail on an existing file, so the check and
    /// the write cannot interleave with another writer.
    async fn write_env_file<H: RemoteHost + ?Sized>(&self, host: &H) -> Result<bool, ReleaseError> {
        const STEP: &str = "create environment file";

        let path = quote(&self.remote.env_file_path());
        let lines: Vec<String> = self
            .env_defaults
            .iter()
            .map(|(key, value)| quote(&format!("{key}={value}")))
            .collect();
        let command = format!(
            "( set -C; printf '%s\\n' {lines} > {path} ) 2>/dev/null && echo {ENV_CREATED} \
             || {{ [ -e {path} ] && echo {ENV_EXISTS}; }}",
            lines = lines.join(" "),
        );

        let output = host
            .exec(&command)
            .await
            .map_err(|source| ScriptError::Host {
                step: STEP.to_string(),
                source,
            })?;

        match output.stdout.trim() {
            ENV_CREATED if output.success() => Ok(true),
            ENV_EXISTS if output.success() => Ok(false),
            _ => Err(ScriptError::Failed {
                step: STEP.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            }
            .into()),
        }
    }

    fn chown(&self) -> String {
        let owner = self
            .remote
            .owner
            .as_deref()
            .map(quote)
            .unwrap_or_else(|| "\"$(id -un)\":\"$(id -gn)\"".to_string());
        self.privileged(&format!(
            "chown -R {owner} {}",
            quote(&self.remote.root)
        ))
    }

    fn privileged(&self, command: &str) -> String {
        if self.remote.sudo {
            format!("sudo -n {command}")
        } else {
            command.to_string()
        }
    }
}
