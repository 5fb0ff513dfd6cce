// ABOUTME: The deployment pipeline: build, deliver, release, reload, verify, roll back.
// ABOUTME: Drives the state machine and reports a pass/fail line per stage.

use std::path::Path;

use crate::artifact::Artifact;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::health::{HealthVerifier, HttpProbe};
use crate::host::{Connector, RemoteHost};
use crate::output::Output;
use crate::release::ReleaseReport;
use crate::supervisor::{ProcessReloader, ReloadOutcome, Supervisor};

use super::error::DeployError;
use super::state::{Built, Reloaded};
use super::{Deployment, Initialized};

/// Summary of a successful deployment.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub artifact: Artifact,
    pub release: ReleaseReport,
    pub outcome: ReloadOutcome,
    pub status: u16,
}

pub struct Pipeline<'a, C, S, P> {
    config: &'a Config,
    connector: &'a C,
    reloader: &'a ProcessReloader<S>,
    verifier: &'a HealthVerifier<P>,
    output: &'a Output,
}

impl<'a, C, S, P> Pipeline<'a, C, S, P>
where
    C: Connector,
    S: Supervisor,
    P: HttpProbe,
{
    pub fn new(
        config: &'a Config,
        connector: &'a C,
        reloader: &'a ProcessReloader<S>,
        verifier: &'a HealthVerifier<P>,
        output: &'a Output,
    ) -> Self {
        Self {
            config,
            connector,
            reloader,
            verifier,
            output,
        }
    }

    /// Deploy `source_dir`. Any error means the run failed; a failed health
    /// check has already been rolled back when this returns.
    pub async fn run(
        &self,
        source_dir: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<DeployReport, DeployError> {
        let deployment: Deployment<Initialized> = Deployment::new(self.config.clone());

        self.output
            .progress(&format!("  → Building {}...", self.config.app));
        let built = deployment
            .build(source_dir)
            .await
            .map_err(|(_, e)| self.failed(e))?;
        self.output.progress(&format!(
            "  ✓ Built {} ({} bytes)",
            built.artifact().file_name(),
            built.artifact().size
        ));

        self.output.progress("  → Connecting to target host...");
        let host = self
            .connector
            .connect()
            .await
            .map_err(|e| self.failed(e.into()))?;

        let reloaded = self.release_on(&host, built, diagnostics).await;

        if let Err(e) = self.connector.disconnect(host).await {
            diagnostics.warn(Warning::ssh_disconnect(format!(
                "disconnect after release failed: {e}"
            )));
        }
        let reloaded = reloaded?;

        self.output.progress("  → Verifying health...");
        match reloaded.verify(self.verifier).await {
            Ok(verified) => {
                let status = verified.health_status();
                self.output
                    .progress(&format!("  ✓ Health check passed ({status})"));
                let state = verified.finish();
                Ok(DeployReport {
                    artifact: state.artifact,
                    release: state.report,
                    outcome: state.outcome,
                    status,
                })
            }
            Err((deployment, DeployError::HealthCheck(failure))) => {
                self.output.step_failed(&failure.to_string());
                self.output.progress("  → Rolling back...");
                match deployment
                    .rollback(self.connector, self.reloader, diagnostics)
                    .await
                {
                    Ok(outcome) => {
                        self.output.step_failed(&outcome.to_string());
                        Err(DeployError::RolledBack { failure, outcome })
                    }
                    Err(source) => {
                        self.output.step_failed(&format!("rollback failed: {source}"));
                        Err(DeployError::Rollback { failure, source })
                    }
                }
            }
            Err((_, e)) => Err(self.failed(e)),
        }
    }

    /// Upload, release, and reload over one connection.
    async fn release_on(
        &self,
        host: &C::Host,
        built: Deployment<Built>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Deployment<Reloaded>, DeployError> {
        self.output.progress("  → Uploading artifact...");
        let delivered = built.deliver(host).await.map_err(|(_, e)| self.failed(e))?;

        self.output.progress("  → Releasing...");
        let released = delivered
            .release(host, diagnostics)
            .await
            .map_err(|(_, e)| self.failed(e))?;

        let report = released.release_report();
        match report.snapshot {
            Some(id) => self.output.progress(&format!("  ✓ Snapshot {id}")),
            None => self.output.progress("  ✓ No previous release to snapshot"),
        }
        if report.env_created {
            self.output
                .progress("  ✓ Created environment file with defaults");
        }

        self.output.progress("  → Reloading process...");
        let host: &dyn RemoteHost = host;
        let reloaded = released
            .reload(host, self.reloader)
            .await
            .map_err(|(_, e)| self.failed(e))?;
        self.output
            .progress(&format!("  ✓ Process {}", reloaded.reload_outcome()));

        Ok(reloaded)
    }

    fn failed(&self, error: DeployError) -> DeployError {
        self.output.step_failed(&error.to_string());
        error
    }
}
