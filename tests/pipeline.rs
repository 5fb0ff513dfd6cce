// ABOUTME: End-to-end pipeline tests against the local machine.
// ABOUTME: Covers first deploy, reload, rollback after failed health checks, and missing snapshots.

mod support;

use caravel::deploy::{DeployError, DeployErrorKind, Pipeline, RollbackOutcome};
use caravel::diagnostics::{Diagnostics, WarningKind};
use caravel::health::HealthVerifier;
use caravel::output::{Output, OutputMode};
use caravel::supervisor::{ProcessReloader, ProcessState, ReloadOutcome};
use support::{CountingConnector, FakeSupervisor, Project, ScriptedProbe};

struct Harness {
    project: Project,
    connector: CountingConnector,
    reloader: ProcessReloader<FakeSupervisor>,
    verifier: HealthVerifier<ScriptedProbe>,
    output: Output,
}

impl Harness {
    fn new() -> Self {
        support::init_tracing();
        let project = Project::new();
        let config = project.config();
        let verifier = HealthVerifier::new(
            ScriptedProbe::default(),
            config.healthcheck.url.clone().unwrap(),
            &config.healthcheck,
        );
        Self {
            project,
            connector: CountingConnector::default(),
            reloader: ProcessReloader::new(FakeSupervisor::default()),
            verifier,
            output: Output::new(OutputMode::Quiet),
        }
    }

    async fn deploy(
        &self,
        version: &str,
        statuses: &[u16],
        diagnostics: &mut Diagnostics,
    ) -> Result<caravel::deploy::DeployReport, DeployError> {
        self.project.set_version(version);
        self.verifier.probe().push(statuses);
        let config = self.project.config();
        Pipeline::new(
            &config,
            &self.connector,
            &self.reloader,
            &self.verifier,
            &self.output,
        )
        .run(self.project.source.path(), diagnostics)
        .await
    }
}

#[tokio::test]
async fn three_deploys_start_reload_and_roll_back() {
    let harness = Harness::new();
    let project = &harness.project;

    // Deploy #1: nothing to snapshot, environment file created, process started.
    let mut diag = Diagnostics::default();
    let first = harness.deploy("v1", &[200], &mut diag).await.unwrap();

    assert_eq!(first.release.snapshot, None);
    assert!(first.release.env_created);
    assert_eq!(first.outcome, ReloadOutcome::Started);
    assert_eq!(first.status, 200);
    assert_eq!(project.deployed_version(), "v1");
    assert_eq!(project.read_root(".env"), "NODE_ENV=production\nPORT=8000\n");
    assert_eq!(project.snapshot_count(), 0);
    assert!(project.root().join("logs").is_dir());
    assert!(!diag.has_warnings());

    // An operator edits the environment file; later deploys must keep it.
    std::fs::write(project.root().join(".env"), "NODE_ENV=production\nPORT=9000\n").unwrap();

    // Deploy #2: healthy, previous release archived, process reloaded.
    let second = harness.deploy("v2", &[200], &mut diag).await.unwrap();

    assert!(second.release.snapshot.is_some());
    assert!(!second.release.env_created);
    assert_eq!(second.outcome, ReloadOutcome::Reloaded);
    assert_eq!(project.deployed_version(), "v2");
    assert_eq!(project.read_root(".env"), "NODE_ENV=production\nPORT=9000\n");
    assert_eq!(project.snapshot_count(), 1);

    // Deploy #3: the endpoint never answers, so deploy #2's output comes back.
    let connects_before = harness.connector.connects();
    let err = harness.deploy("v3", &[0, 0], &mut diag).await.unwrap_err();

    let DeployError::RolledBack { failure, outcome } = &err else {
        panic!("expected a rolled back deployment, got {err}");
    };
    assert_eq!(failure.attempts, 2);
    assert_eq!(failure.last_status, 0);
    assert!(matches!(outcome, RollbackOutcome::Restored(_)));
    assert_eq!(err.kind(), DeployErrorKind::RolledBack);

    assert_eq!(project.deployed_version(), "v2");
    assert_eq!(project.read_root(".env"), "NODE_ENV=production\nPORT=9000\n");
    assert_eq!(project.snapshot_count(), 2);

    // Release and rollback each used their own connection.
    assert_eq!(harness.connector.connects() - connects_before, 2);
    assert_eq!(harness.connector.connects(), harness.connector.disconnects());

    assert_eq!(
        harness.reloader.supervisor().calls(),
        [
            "describe", "start", "save", // deploy #1
            "describe", "reload", "save", // deploy #2
            "describe", "reload", "save", // deploy #3
            "reload", "save", // rollback
        ]
    );
    assert_eq!(harness.reloader.state(), ProcessState::Running);
    assert_eq!(harness.verifier.probe().calls(), 4);
}

#[tokio::test]
async fn failed_first_deploy_has_nothing_to_roll_back() {
    let harness = Harness::new();
    let mut diag = Diagnostics::default();

    let err = harness.deploy("v1", &[500, 502], &mut diag).await.unwrap_err();

    assert!(matches!(
        err,
        DeployError::RolledBack {
            outcome: RollbackOutcome::NoSnapshot,
            ..
        }
    ));
    // Rollback fabricated nothing: the failed release is still in place.
    assert_eq!(harness.project.deployed_version(), "v1");
    assert_eq!(
        harness.reloader.supervisor().calls(),
        ["describe", "start", "save"]
    );
    assert!(
        diag.warnings()
            .iter()
            .any(|w| w.kind == WarningKind::RollbackNoSnapshot)
    );
}

#[tokio::test]
async fn build_failure_never_connects() {
    let harness = Harness::new();
    std::fs::remove_file(harness.project.source.path().join("package-lock.json")).unwrap();
    let mut diag = Diagnostics::default();

    let err = harness.deploy("v1", &[200], &mut diag).await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Build);
    assert_eq!(harness.connector.connects(), 0);
    assert!(!harness.project.root().exists());
}

#[tokio::test]
async fn release_failure_does_not_reload() {
    let harness = Harness::new();
    let mut diag = Diagnostics::default();
    harness.deploy("v1", &[200], &mut diag).await.unwrap();

    // Break the install step for the next release.
    let mut config = harness.project.config();
    config.install.command = "exit 3".to_string();
    harness.project.set_version("v2");
    let err = Pipeline::new(
        &config,
        &harness.connector,
        &harness.reloader,
        &harness.verifier,
        &harness.output,
    )
    .run(harness.project.source.path(), &mut diag)
    .await
    .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Release);
    assert!(err.to_string().contains("install dependencies"));
    // The snapshot taken before the failed install is kept for manual recovery.
    assert_eq!(harness.project.snapshot_count(), 1);
    assert_eq!(
        harness.reloader.supervisor().calls(),
        ["describe", "start", "save"]
    );
    assert_eq!(harness.connector.connects(), harness.connector.disconnects());
}

#[tokio::test]
async fn redeploying_restored_artifact_converges() {
    let harness = Harness::new();
    let mut diag = Diagnostics::default();
    harness.deploy("v1", &[200], &mut diag).await.unwrap();
    harness.deploy("v2", &[200], &mut diag).await.unwrap();
    harness.deploy("v3", &[0, 0], &mut diag).await.unwrap_err();
    assert_eq!(harness.project.deployed_version(), "v2");

    harness.deploy("v2", &[200], &mut diag).await.unwrap();

    assert_eq!(harness.project.deployed_version(), "v2");
    assert_eq!(
        harness.project.read_root("package.json"),
        r#"{"name":"shop"}"#
    );
}
