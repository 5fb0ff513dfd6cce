// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::path::Path;

use crate::artifact::ArtifactBuilder;
use crate::diagnostics::Diagnostics;
use crate::health::{HealthVerifier, HttpProbe};
use crate::host::{Connector, RemoteHost};
use crate::release::ReleaseController;
use crate::supervisor::{ProcessReloader, Supervisor};

use super::Deployment;
use super::error::DeployError;
use super::rollback::{RollbackError, RollbackOutcome, manual_rollback};
use super::state::{Built, Delivered, Initialized, Released, Reloaded, Verified};

/// Result type for transitions that hand the deployment back on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            state,
        }
    }
}

// =============================================================================
// Initialized -> Built
// =============================================================================

impl Deployment<Initialized> {
    /// Compile and package `source_dir`.
    pub async fn build(self, source_dir: &Path) -> TransitionResult<Built, Initialized> {
        let builder = ArtifactBuilder::new(self.config.app.clone(), self.config.build.clone());
        match builder.build(source_dir).await {
            Ok(artifact) => Ok(self.transition(Built { artifact })),
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Built -> Delivered
// =============================================================================

impl Deployment<Built> {
    /// Upload the artifact into the host's upload directory.
    pub async fn deliver<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> TransitionResult<Delivered, Built> {
        let remote_archive = format!(
            "{}/{}",
            self.config.remote.upload_dir.trim_end_matches('/'),
            self.state.artifact.file_name()
        );

        tracing::debug!(size = self.state.artifact.size, "uploading artifact");
        if let Err(e) = host.upload(&self.state.artifact.path, &remote_archive).await {
            return Err((self, e.into()));
        }

        let artifact = self.state.artifact.clone();
        Ok(self.transition(Delivered {
            artifact,
            remote_archive,
        }))
    }
}

// =============================================================================
// Delivered -> Released
// =============================================================================

impl Deployment<Delivered> {
    /// Run the release steps against the uploaded archive.
    pub async fn release<H: RemoteHost + ?Sized>(
        self,
        host: &H,
        diagnostics: &mut Diagnostics,
    ) -> TransitionResult<Released, Delivered> {
        let controller = ReleaseController::new(&self.config);
        let result = controller
            .release(host, &self.state.remote_archive, diagnostics)
            .await;

        match result {
            Ok(report) => {
                let artifact = self.state.artifact.clone();
                Ok(self.transition(Released { artifact, report }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Released -> Reloaded
// =============================================================================

impl Deployment<Released> {
    /// Start or reload the supervised process on the new release.
    pub async fn reload<S: Supervisor>(
        self,
        host: &dyn RemoteHost,
        reloader: &ProcessReloader<S>,
    ) -> TransitionResult<Reloaded, Released> {
        let result = reloader.ensure_running(host, &self.config.app).await;
        match result {
            Ok(outcome) => {
                let Released { artifact, report } = self.state.clone();
                Ok(self.transition(Reloaded {
                    artifact,
                    report,
                    outcome,
                }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Reloaded -> Verified (or rollback)
// =============================================================================

impl Deployment<Reloaded> {
    /// Poll the health endpoint. On failure the deployment comes back so that
    /// `rollback()` can be called on it.
    pub async fn verify<P: HttpProbe>(
        self,
        verifier: &HealthVerifier<P>,
    ) -> TransitionResult<Verified, Reloaded> {
        match verifier.verify().await {
            Ok(status) => {
                let Reloaded {
                    artifact,
                    report,
                    outcome,
                } = self.state.clone();
                Ok(self.transition(Verified {
                    artifact,
                    report,
                    outcome,
                    status,
                }))
            }
            Err(failure) => Err((self, failure.into())),
        }
    }

    /// Restore the snapshot taken before this release and reload from it.
    ///
    /// Always opens a new connection; the one used for the release is gone by now.
    pub async fn rollback<C: Connector, S: Supervisor>(
        self,
        connector: &C,
        reloader: &ProcessReloader<S>,
        diagnostics: &mut Diagnostics,
    ) -> Result<RollbackOutcome, RollbackError> {
        manual_rollback(&self.config, connector, reloader, diagnostics).await
    }
}

impl Deployment<Verified> {
    /// Finish the deployment, yielding the final state.
    pub fn finish(self) -> Verified {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::LocalHost;
    use nonempty::nonempty;

    fn config(root: &Path) -> Config {
        let mut config = Config::template();
        config.remote.root = root.to_str().unwrap().to_string();
        config.build.command = "mkdir -p dist && echo v1 > dist/app.js".to_string();
        config.build.include = nonempty!["dist".to_string()];
        config
    }

    #[tokio::test]
    async fn failed_build_returns_initialized_deployment() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let mut config = config(root.path());
        config.build.command = "exit 1".to_string();

        let (deployment, err) = Deployment::new(config).build(src.path()).await.unwrap_err();

        assert!(matches!(err, DeployError::Build(_)));
        assert_eq!(deployment.app().as_str(), "my-app");
    }

    #[tokio::test]
    async fn delivered_archive_lands_in_upload_dir() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let mut config = config(root.path());
        config.remote.upload_dir = format!("{}/", uploads.path().display());

        let built = Deployment::new(config).build(src.path()).await.unwrap();
        let delivered = built.deliver(&LocalHost::default()).await.unwrap();

        let expected = uploads.path().join(delivered.artifact().file_name());
        assert_eq!(delivered.remote_archive(), expected.to_str().unwrap());
        assert!(expected.exists());
    }
}
